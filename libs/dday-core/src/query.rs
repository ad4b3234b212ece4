//! List query parsing
//!
//! Turns raw query-string values into typed [`QueryPart`]s. Parsing is lenient:
//! a value that cannot be understood is replaced by its default or dropped,
//! never reported as an error.

use crate::database::{
    Column, EqualityFilter, PagingWindow, QueryPart, SortSpec, TextSearchFilter,
};
use crate::models::Category;
use dday_common::{parse_flag, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Raw list parameters as they arrive on the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_important: Option<String>,
}

/// Normalized list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page, always at least 1
    pub page: u32,
    /// Rows per page, within `1..=MAX_PAGE_SIZE`
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    pub search: Option<String>,
    pub category: Option<Category>,
    pub is_important: Option<bool>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            search: None,
            category: None,
            is_important: None,
        }
    }
}

fn positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

impl ListQuery {
    #[must_use]
    pub fn from_params(params: &ListParams) -> Self {
        let page = positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let page_size = positive(params.page_size.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        let sort = trimmed(params.order_by.as_deref()).and_then(|order_by| {
            SortSpec::parse(order_by, params.direction.as_deref().unwrap_or_default().trim())
        });

        // An unknown category is ignored rather than rejected.
        let category = trimmed(params.category.as_deref()).and_then(Category::from_label);

        Self {
            page,
            page_size,
            sort,
            search: trimmed(params.search.as_deref()).map(str::to_string),
            category,
            is_important: params.is_important.as_deref().and_then(parse_flag),
        }
    }

    #[must_use]
    pub fn paging(&self) -> PagingWindow {
        PagingWindow::new(self.page, self.page_size)
    }

    /// Filters in search, category, importance order
    #[must_use]
    pub fn filter_parts(&self) -> Vec<QueryPart> {
        let mut parts = Vec::new();
        if let Some(search) = &self.search {
            parts.push(TextSearchFilter::title_or_memo(search).into());
        }
        if let Some(category) = self.category {
            parts.push(EqualityFilter::equals(Column::Category, category).into());
        }
        if let Some(flag) = self.is_important {
            parts.push(EqualityFilter::equals(Column::IsImportant, flag).into());
        }
        parts
    }

    /// Sort (when requested) followed by the paging window
    #[must_use]
    pub fn window_parts(&self) -> Vec<QueryPart> {
        let mut parts = Vec::with_capacity(2);
        if let Some(sort) = self.sort {
            parts.push(sort.into());
        }
        parts.push(self.paging().into());
        parts
    }

    /// Filters, sort and paging for a page query
    #[must_use]
    pub fn parts(&self) -> Vec<QueryPart> {
        let mut parts = self.filter_parts();
        parts.extend(self.window_parts());
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{QueryValue, SortDirection};

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "page" => params.page = value,
                "pageSize" => params.page_size = value,
                "orderBy" => params.order_by = value,
                "direction" => params.direction = value,
                "search" => params.search = value,
                "category" => params.category = value,
                "isImportant" => params.is_important = value,
                other => panic!("unknown key {other}"),
            }
        }
        params
    }

    #[test]
    fn test_defaults() {
        let query = ListQuery::from_params(&ListParams::default());
        assert_eq!(query, ListQuery::default());
        assert!(query.filter_parts().is_empty());
        assert_eq!(query.parts(), vec![QueryPart::Paging(PagingWindow::new(1, 10))]);
    }

    #[test]
    fn test_paging_normalization() {
        let cases = [
            ("0", "0", 1, 10),
            ("-2", "-5", 1, 10),
            ("abc", "x", 1, 10),
            ("3", "250", 3, 100),
            (" 2 ", "20", 2, 20),
        ];
        for (page, size, want_page, want_size) in cases {
            let query = ListQuery::from_params(&params(&[("page", page), ("pageSize", size)]));
            assert_eq!(query.page, want_page, "page {page:?}");
            assert_eq!(query.page_size, want_size, "pageSize {size:?}");
        }
    }

    #[test]
    fn test_sort_parsing() {
        let query = ListQuery::from_params(&params(&[
            ("orderBy", "Title"),
            ("direction", "DESC"),
        ]));
        assert_eq!(
            query.sort,
            Some(SortSpec::new(Column::Title, SortDirection::Desc))
        );

        let query = ListQuery::from_params(&params(&[
            ("orderBy", "title"),
            ("direction", "desc"),
        ]));
        assert_eq!(
            query.sort,
            Some(SortSpec::new(Column::Title, SortDirection::Asc))
        );

        let query = ListQuery::from_params(&params(&[
            ("orderBy", "created_at"),
            ("direction", "sideways"),
        ]));
        assert_eq!(
            query.sort,
            Some(SortSpec::new(Column::CreatedAt, SortDirection::Asc))
        );

        let query = ListQuery::from_params(&params(&[("orderBy", "d_title; DROP TABLE")]));
        assert_eq!(query.sort, None);
    }

    #[test]
    fn test_filters() {
        let query = ListQuery::from_params(&params(&[
            ("search", "  exam "),
            ("category", "학업"),
            ("isImportant", "1"),
        ]));

        assert_eq!(query.search.as_deref(), Some("exam"));
        assert_eq!(query.category, Some(Category::Study));
        assert_eq!(query.is_important, Some(true));

        let parts = query.filter_parts();
        assert_eq!(parts.len(), 3);
        assert!(matches!(parts[0], QueryPart::TextSearch(_)));
        assert_eq!(
            parts[1],
            QueryPart::Equals(EqualityFilter::equals(
                Column::Category,
                QueryValue::Text("학업".to_string())
            ))
        );
        assert_eq!(
            parts[2],
            QueryPart::Equals(EqualityFilter::equals(Column::IsImportant, true))
        );
    }

    #[test]
    fn test_invalid_filters_are_ignored() {
        let query = ListQuery::from_params(&params(&[
            ("search", "   "),
            ("category", "travel"),
            ("isImportant", "maybe"),
        ]));
        assert!(query.filter_parts().is_empty());
    }

    #[test]
    fn test_importance_flag_values() {
        for (raw, want) in [
            ("true", Some(true)),
            ("0", Some(false)),
            ("false", Some(false)),
            ("yes", None),
        ] {
            let query = ListQuery::from_params(&params(&[("isImportant", raw)]));
            assert_eq!(query.is_important, want, "{raw}");
        }
    }

    #[test]
    fn test_parts_order() {
        let query = ListQuery::from_params(&params(&[
            ("page", "2"),
            ("orderBy", "title"),
            ("category", "업무"),
        ]));
        let parts = query.parts();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].is_filter());
        assert!(matches!(parts[1], QueryPart::Sort(_)));
        assert_eq!(parts[2], QueryPart::Paging(PagingWindow::new(2, 10)));
        assert_eq!(query.window_parts(), parts[1..].to_vec());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let params: ListParams =
            serde_json::from_str(r#"{"pageSize":"5","orderBy":"title","isImportant":"true"}"#)
                .unwrap();
        assert_eq!(params.page_size.as_deref(), Some("5"));
        assert_eq!(params.order_by.as_deref(), Some("title"));
        assert_eq!(params.is_important.as_deref(), Some("true"));
        assert!(params.page.is_none());
    }
}
