use chrono::{DateTime, Utc};
use tracing::warn;

use crate::db::PriceStore;

/// One element of the comma-separated item parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPattern<'a> {
    /// A bare `*`. Matches nothing.
    Nothing,
    /// Contains `*` somewhere; expanded against the store.
    Glob(&'a str),
    /// Passed through as-is, without checking that the item exists.
    Literal(&'a str),
}

impl<'a> ItemPattern<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            ItemPattern::Nothing
        } else if raw.contains('*') {
            ItemPattern::Glob(raw)
        } else {
            ItemPattern::Literal(raw)
        }
    }
}

/// `*` becomes the SQL `LIKE` any-run wildcard. Nothing else is rewritten.
pub fn glob_to_like(glob: &str) -> String {
    glob.replace('*', "%")
}

/// Expands the item parameter into literal item IDs.
///
/// Globs only match items with an observation inside the freshness window.
/// A failed expansion is logged and that pattern contributes nothing.
/// Duplicates are preserved.
pub async fn resolve_items(
    store: &dyn PriceStore,
    csv: &str,
    cutoff: DateTime<Utc>,
) -> Vec<String> {
    let mut item_ids = Vec::new();

    for raw in csv.split(',') {
        if raw.trim().is_empty() {
            continue;
        }
        match ItemPattern::classify(raw) {
            ItemPattern::Nothing => {}
            ItemPattern::Literal(id) => item_ids.push(id.to_string()),
            ItemPattern::Glob(glob) => {
                let like = glob_to_like(glob);
                match store.distinct_item_ids(&like, cutoff).await {
                    Ok(found) => item_ids.extend(found),
                    Err(e) => warn!(pattern = glob, "item pattern expansion failed: {e}"),
                }
            }
        }
    }

    item_ids
}
