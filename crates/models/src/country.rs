//! Country catalog domain types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub code: String,
    pub name: String,
    pub official_name: String,
    pub region: String,
    pub sub_region: String,
    pub population: i64,
    pub capitals: Vec<String>,
    pub flag_url: String,
    pub languages: Vec<String>,
    pub currency: CurrencyInfo,
}

/// Query-string filters for the paged country listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountryFilter {
    pub search_term: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
    pub page_number: i64,
    pub page_size: i64,
    pub sort_by: Option<String>,
    pub ascending: bool,
}

impl Default for CountryFilter {
    fn default() -> Self {
        Self {
            search_term: None,
            region: None,
            language: None,
            page_number: 1,
            page_size: 10,
            sort_by: Some("Name".into()),
            ascending: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResult<T> {
    /// `page_size` must be positive.
    pub fn new(items: Vec<T>, total_count: i64, page_number: i64, page_size: i64) -> Self {
        let total_pages = (total_count + page_size - 1) / page_size;
        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_math() {
        let p: PagedResult<()> = PagedResult::new(vec![], 21, 1, 10);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_previous_page);

        let last: PagedResult<()> = PagedResult::new(vec![], 21, 3, 10);
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);

        let empty: PagedResult<()> = PagedResult::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
    }

    #[test]
    fn filter_defaults_fill_missing_query_fields() {
        let f: CountryFilter = serde_json::from_str(r#"{"region":"Asia"}"#).expect("parse");
        assert_eq!(f.page_number, 1);
        assert_eq!(f.page_size, 10);
        assert!(f.ascending);
        assert_eq!(f.region.as_deref(), Some("Asia"));
    }
}
