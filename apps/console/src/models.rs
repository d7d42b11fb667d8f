use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};

/// Paginated list envelope returned by every list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self, size: u32) -> u64 {
        total_pages(self.count, size)
    }
}

pub fn total_pages(count: u64, size: u32) -> u64 {
    if size == 0 {
        0
    } else {
        count.div_ceil(u64::from(size))
    }
}

pub type Row = Value;

/// Renders one cell of a loosely typed row.
pub fn cell_text(row: &Row, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => "—".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(map)) => map
            .get("name")
            .or_else(|| map.get("full_name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        Some(other) => other.to_string(),
    }
}

/// Decimal amounts arrive as strings.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    #[serde_as(as = "DisplayFromStr")]
    pub revenue: f64,
    #[serde_as(as = "DisplayFromStr")]
    pub expenses: f64,
    #[serde(default)]
    pub orders_count: u64,
    #[serde(default)]
    pub clients_count: u64,
    #[serde(default)]
    pub average_check: Option<String>,
}

impl DashboardSummary {
    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn total_pages_rounds_up_and_guards_zero_size() {
        assert_eq!(total_pages(95, 20), 5);
        assert_eq!(total_pages(100, 20), 5);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(95, 0), 0);
    }

    #[test]
    fn page_decodes_with_missing_fields() {
        let page: Page<Row> = serde_json::from_value(json!({ "count": 41 })).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages(20), 3);
    }

    #[test]
    fn summary_parses_decimal_strings() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "revenue": "1500.50",
            "expenses": "500.25",
            "orders_count": 12
        }))
        .unwrap();
        assert_eq!(summary.orders_count, 12);
        assert!((summary.profit() - 1000.25).abs() < f64::EPSILON);
    }

    #[test]
    fn cells_flatten_nested_names() {
        let row = json!({
            "employee": { "id": 3, "full_name": "Aziz" },
            "total": 120,
            "comment": null
        });
        assert_eq!(cell_text(&row, "employee"), "Aziz");
        assert_eq!(cell_text(&row, "total"), "120");
        assert_eq!(cell_text(&row, "comment"), "—");
        assert_eq!(cell_text(&row, "missing"), "—");
    }
}
