//! HTML table rendering of price stats for quick inspection in a browser.

use chrono::{DateTime, Utc};

use crate::types::PriceExtremeResult;

/// Table columns. Header and row cells both come from here, in this order.
#[derive(Debug, Clone, Copy)]
enum Column {
    ItemId,
    City,
    SellPriceMin,
    SellPriceMinDate,
    SellPriceMax,
    SellPriceMaxDate,
    BuyPriceMin,
    BuyPriceMinDate,
    BuyPriceMax,
    BuyPriceMaxDate,
}

const COLUMNS: [Column; 10] = [
    Column::ItemId,
    Column::City,
    Column::SellPriceMin,
    Column::SellPriceMinDate,
    Column::SellPriceMax,
    Column::SellPriceMaxDate,
    Column::BuyPriceMin,
    Column::BuyPriceMinDate,
    Column::BuyPriceMax,
    Column::BuyPriceMaxDate,
];

impl Column {
    fn header(self) -> &'static str {
        match self {
            Column::ItemId => "item_id",
            Column::City => "city",
            Column::SellPriceMin => "sell_price_min",
            Column::SellPriceMinDate => "sell_price_min_date",
            Column::SellPriceMax => "sell_price_max",
            Column::SellPriceMaxDate => "sell_price_max_date",
            Column::BuyPriceMin => "buy_price_min",
            Column::BuyPriceMinDate => "buy_price_min_date",
            Column::BuyPriceMax => "buy_price_max",
            Column::BuyPriceMaxDate => "buy_price_max_date",
        }
    }

    fn cell(self, r: &PriceExtremeResult) -> String {
        match self {
            Column::ItemId => r.item_id.clone(),
            Column::City => r.location.to_string(),
            Column::SellPriceMin => price(r.sell_price_min),
            Column::SellPriceMinDate => date(r.sell_price_min_date),
            Column::SellPriceMax => price(r.sell_price_max),
            Column::SellPriceMaxDate => date(r.sell_price_max_date),
            Column::BuyPriceMin => price(r.buy_price_min),
            Column::BuyPriceMinDate => date(r.buy_price_min_date),
            Column::BuyPriceMax => price(r.buy_price_max),
            Column::BuyPriceMaxDate => date(r.buy_price_max_date),
        }
    }
}

const HEAD: &str = r#"<html>
	<head>
		<style>
			table, th, td {
				border: 1px solid black;
				border-collapse: collapse;
			}
		</style>
	</head>
	<body>
		<table style='width:100%'>
"#;

const TAIL: &str = r#"		</table>
	</body>
</html>"#;

fn price(p: Option<i64>) -> String {
    p.map(|p| p.to_string()).unwrap_or_default()
}

fn date(d: Option<DateTime<Utc>>) -> String {
    d.map(|d| d.to_rfc3339()).unwrap_or_default()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render_table(rows: &[PriceExtremeResult]) -> String {
    let mut html = String::from(HEAD);

    html.push_str("\t\t\t<tr>");
    for column in COLUMNS {
        html.push_str("<th>");
        html.push_str(column.header());
        html.push_str("</th>");
    }
    html.push_str("</tr>\n");

    for row in rows {
        html.push_str("\t\t\t<tr>");
        for column in COLUMNS {
            html.push_str("<td>");
            html.push_str(&escape(&column.cell(row)));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }

    html.push_str(TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;
    use chrono::TimeZone;

    fn row(item_id: &str) -> PriceExtremeResult {
        PriceExtremeResult {
            item_id: item_id.to_string(),
            location: Location::FortSterling,
            sell_price_min: Some(40),
            sell_price_min_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 45).unwrap()),
            sell_price_max: Some(0),
            sell_price_max_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 30).unwrap()),
            buy_price_min: None,
            buy_price_min_date: None,
            buy_price_max: None,
            buy_price_max_date: None,
        }
    }

    #[test]
    fn header_lists_columns_in_order() {
        let html = render_table(&[]);
        let header = concat!(
            "<tr><th>item_id</th><th>city</th>",
            "<th>sell_price_min</th><th>sell_price_min_date</th>",
            "<th>sell_price_max</th><th>sell_price_max_date</th>",
            "<th>buy_price_min</th><th>buy_price_min_date</th>",
            "<th>buy_price_max</th><th>buy_price_max_date</th></tr>",
        );
        assert!(html.contains(header), "{html}");
        assert!(!html.contains("<td>"));
    }

    #[test]
    fn row_cells_follow_column_order_and_leave_absent_fields_empty() {
        let html = render_table(&[row("T4_BAG")]);
        let expected = concat!(
            "<tr><td>T4_BAG</td><td>Fort Sterling</td>",
            "<td>40</td><td>2024-03-01T12:00:45+00:00</td>",
            "<td>0</td><td>2024-03-01T12:00:30+00:00</td>",
            "<td></td><td></td><td></td><td></td></tr>",
        );
        assert!(html.contains(expected), "{html}");
    }

    #[test]
    fn item_ids_are_escaped() {
        let html = render_table(&[row("<script>alert('x')</script>")]);
        let escaped = "<td>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</td>";
        assert!(html.contains(escaped));
        assert!(!html.contains("<script>"));
    }
}
