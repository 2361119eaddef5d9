use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One row of the search-query performance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQueryRow {
    #[serde(rename = "Query")]
    pub query: String,
}

impl SearchQueryRow {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Runs report queries against the advertising account.
///
/// Failures are returned as-is and end processing of the current sheet.
pub trait ReportSource {
    fn search_queries(&mut self, report_query: &str) -> Result<Vec<SearchQueryRow>>;
}

impl<T: ReportSource + ?Sized> ReportSource for &mut T {
    fn search_queries(&mut self, report_query: &str) -> Result<Vec<SearchQueryRow>> {
        (**self).search_queries(report_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_uses_report_column_name() {
        let row: SearchQueryRow = serde_json::from_str(r#"{ "Query": "red shoes" }"#).unwrap();
        assert_eq!(row, SearchQueryRow::new("red shoes"));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"Query":"red shoes"}"#
        );
    }
}
