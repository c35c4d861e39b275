use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A market location. The discriminant is the in-game cluster ID, which is
/// also what the ingest pipeline stores in the `location` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum Location {
    Thetford = 7,
    SwampCross = 4,
    Lymhurst = 1002,
    ForestCross = 1006,
    Bridgewatch = 2004,
    SteppeCross = 2002,
    HighlandCross = 3002,
    Caerleon = 3005,
    Martlock = 3008,
    FortSterling = 4002,
    MountainCross = 4006,
}

/// Canonical order. Fuzzy resolution scans in this order and takes the
/// first hit, so `"Cross"` resolves to Swamp Cross.
pub const LOCATIONS: [Location; 11] = [
    Location::Thetford,
    Location::SwampCross,
    Location::Lymhurst,
    Location::ForestCross,
    Location::Bridgewatch,
    Location::SteppeCross,
    Location::HighlandCross,
    Location::Caerleon,
    Location::Martlock,
    Location::FortSterling,
    Location::MountainCross,
];

impl Location {
    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        LOCATIONS.iter().copied().find(|l| l.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Location::Thetford => "Thetford",
            Location::SwampCross => "Swamp Cross",
            Location::Lymhurst => "Lymhurst",
            Location::ForestCross => "Forest Cross",
            Location::Bridgewatch => "Bridgewatch",
            Location::SteppeCross => "Steppe Cross",
            Location::HighlandCross => "Highland Cross",
            Location::Caerleon => "Caerleon",
            Location::Martlock => "Martlock",
            Location::FortSterling => "Fort Sterling",
            Location::MountainCross => "Mountain Cross",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolves filter tokens against the canonical list.
///
/// No tokens means every location. Otherwise each token picks the first
/// location whose name contains it (case-sensitive). Unmatched tokens are
/// dropped and repeated tokens yield repeated locations.
pub fn resolve<S: AsRef<str>>(tokens: &[S]) -> Vec<Location> {
    if tokens.is_empty() {
        return LOCATIONS.to_vec();
    }
    tokens
        .iter()
        .filter_map(|token| {
            let token = token.as_ref();
            LOCATIONS.iter().copied().find(|l| l.name().contains(token))
        })
        .collect()
}

/// Splits the `locations` query parameter. An empty parameter is "no filter".
pub fn resolve_csv(csv: &str) -> Vec<Location> {
    if csv.is_empty() {
        return resolve::<&str>(&[]);
    }
    let tokens: Vec<&str> = csv.split(',').collect();
    resolve(&tokens)
}
