//! The stats API response envelope.
//!
//! Every endpoint returns the same shape: a resource name, the echoed
//! request parameters, and one or more `resultSets`, each a small table of
//! column headers plus untyped rows. Rows are kept as raw JSON values and
//! read through [`Row`], which pairs cells with their header names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level response returned by every stats endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub resource: String,
    /// Echoed request parameters. Shape varies by endpoint (object or
    /// array), so it stays untyped.
    #[serde(default)]
    pub parameters: Value,
    pub result_sets: Vec<ResultSet>,
}

impl StatsResponse {
    /// Finds a result set by name.
    pub fn result_set(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.iter().find(|rs| rs.name == name)
    }

    /// The first result set, which by upstream convention carries the
    /// primary payload.
    pub fn first_result_set(&self) -> Option<&ResultSet> {
        self.result_sets.first()
    }
}

/// One named table within a response: column headers plus rows of cells.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub name: String,
    pub headers: Vec<String>,
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Index of a column by header name, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Iterates the rows as header-aware [`Row`] views.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.row_set.iter().map(move |cells| Row { set: self, cells })
    }

    pub fn is_empty(&self) -> bool {
        self.row_set.is_empty()
    }

    pub fn len(&self) -> usize {
        self.row_set.len()
    }
}

/// A single row of a result set, read by column name.
///
/// Accessors return `None` for absent columns, null cells, or cells of the
/// wrong JSON type; numeric accessors accept both integer and float cells
/// because the upstream is inconsistent about which it emits.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    set: &'a ResultSet,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    fn cell(&self, name: &str) -> Option<&'a Value> {
        let idx = self.set.column(name)?;
        self.cells.get(idx)
    }

    pub fn str_field(&self, name: &str) -> Option<&'a str> {
        self.cell(name)?.as_str()
    }

    pub fn i64_field(&self, name: &str) -> Option<i64> {
        let cell = self.cell(name)?;
        cell.as_i64().or_else(|| cell.as_f64().map(|f| f as i64))
    }

    pub fn u32_field(&self, name: &str) -> Option<u32> {
        self.i64_field(name).and_then(|v| u32::try_from(v).ok())
    }

    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.cell(name)?.as_f64()
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        let cell = self.cell(name)?;
        cell.as_bool().or_else(|| cell.as_i64().map(|v| v != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StatsResponse {
        serde_json::from_value(json!({
            "resource": "shotchartdetail",
            "parameters": {"GameID": "0022400001"},
            "resultSets": [{
                "name": "Shot_Chart_Detail",
                "headers": ["GAME_ID", "PLAYER_NAME", "LOC_X", "SHOT_MADE_FLAG"],
                "rowSet": [
                    ["0022400001", "De'Aaron Fox", -118, 1],
                    ["0022400001", "Domantas Sabonis", 4.5, 0]
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn result_set_lookup_by_name() {
        let resp = sample();
        assert!(resp.result_set("Shot_Chart_Detail").is_some());
        assert!(resp.result_set("LeagueAverages").is_none());
    }

    #[test]
    fn row_accessors_by_header() {
        let resp = sample();
        let rs = resp.first_result_set().unwrap();
        let row = rs.rows().next().unwrap();
        assert_eq!(row.str_field("PLAYER_NAME"), Some("De'Aaron Fox"));
        assert_eq!(row.i64_field("LOC_X"), Some(-118));
        assert_eq!(row.bool_field("SHOT_MADE_FLAG"), Some(true));
        assert_eq!(row.str_field("NO_SUCH_COLUMN"), None);
    }

    #[test]
    fn numeric_accessor_accepts_floats() {
        let resp = sample();
        let rs = resp.first_result_set().unwrap();
        let row = rs.rows().nth(1).unwrap();
        assert_eq!(row.f64_field("LOC_X"), Some(4.5));
        assert_eq!(row.i64_field("LOC_X"), Some(4));
    }
}
