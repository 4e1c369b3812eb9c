use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient_i64;

/// One row of the company-wise placement statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementStat {
    pub company_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub total_offers: i64,
}

/// One row of the student-wise placement view. Its columns are defined by the
/// backend's database view, so the row is kept as an ordered field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentPlacement {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl StudentPlacement {
    /// Display text for one column; empty when absent or null.
    pub fn cell(&self, column: &str) -> String {
        match self.fields.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_accepts_string_counts() {
        let stat: PlacementStat =
            serde_json::from_str(r#"{"company_name": "Acme", "total_offers": "4"}"#).unwrap();
        assert_eq!(stat.total_offers, 4);
    }

    #[test]
    fn test_placement_cells() {
        let row: StudentPlacement =
            serde_json::from_str(r#"{"name": "Asha", "offers": 2, "status": null}"#).unwrap();
        assert_eq!(row.cell("name"), "Asha");
        assert_eq!(row.cell("offers"), "2");
        assert_eq!(row.cell("status"), "");
        assert_eq!(row.cell("missing"), "");
    }
}
