//! SQL query builder for listing and counting D-Day records
//!
//! Queries are assembled from a closed set of [`QueryPart`] primitives. Column
//! names only ever come from [`Column::as_sql`] and the free-text template is a
//! compile-time constant, so user input reaches the database exclusively as
//! bound parameters.

use crate::models::Category;

/// Allow-listed columns of the `ddays_tb` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Title,
    TargetDate,
    Category,
    Memo,
    IsImportant,
    CreatedAt,
    UpdatedAt,
}

impl Column {
    /// Physical column name
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Column::Id => "d_id",
            Column::Title => "d_title",
            Column::TargetDate => "d_target_date",
            Column::Category => "d_category",
            Column::Memo => "d_memo",
            Column::IsImportant => "d_is_important",
            Column::CreatedAt => "d_created_at",
            Column::UpdatedAt => "d_updated_at",
        }
    }

    /// Map a client-facing sort key to a column
    ///
    /// Matching is case-insensitive. Unknown keys (and `memo`, which is not
    /// sortable) yield `None`.
    #[must_use]
    pub fn from_sort_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "id" => Some(Column::Id),
            "title" => Some(Column::Title),
            "target_date" => Some(Column::TargetDate),
            "category" => Some(Column::Category),
            "is_important" => Some(Column::IsImportant),
            "created_at" => Some(Column::CreatedAt),
            "updated_at" => Some(Column::UpdatedAt),
            _ => None,
        }
    }
}

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    Bool(bool),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Category> for QueryValue {
    fn from(value: Category) -> Self {
        QueryValue::Text(value.as_str().to_string())
    }
}

/// Comparison operator of an equality filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareOp {
    #[default]
    Eq,
}

impl CompareOp {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
        }
    }
}

/// `<column> <op> ?` predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    pub column: Column,
    pub value: QueryValue,
    pub op: CompareOp,
}

impl EqualityFilter {
    /// `column = value`
    pub fn equals(column: Column, value: impl Into<QueryValue>) -> Self {
        Self {
            column,
            value: value.into(),
            op: CompareOp::Eq,
        }
    }
}

const TITLE_OR_MEMO_LIKE: &str = "(d_title LIKE ? OR d_memo LIKE ?)";

/// Fixed SQL fragment with positional arguments
///
/// Fields are private: the only way to get one is through a constructor that
/// supplies a constant template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearchFilter {
    template: &'static str,
    args: Vec<QueryValue>,
}

impl TextSearchFilter {
    /// Substring match on title or memo
    ///
    /// `LIKE` is case-insensitive for ASCII in SQLite.
    #[must_use]
    pub fn title_or_memo(text: &str) -> Self {
        let pattern = format!("%{text}%");
        Self {
            template: TITLE_OR_MEMO_LIKE,
            args: vec![QueryValue::Text(pattern.clone()), QueryValue::Text(pattern)],
        }
    }

    #[must_use]
    pub fn template(&self) -> &'static str {
        self.template
    }

    #[must_use]
    pub fn args(&self) -> &[QueryValue] {
        &self.args
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Exactly `DESC` sorts descending, anything else ascending
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "DESC" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Single-column ORDER BY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub const fn new(column: Column, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Build a sort from client input
    ///
    /// Returns `None` for a key outside the allow-list; the caller then falls
    /// back to its default order.
    #[must_use]
    pub fn parse(order_by: &str, direction: &str) -> Option<Self> {
        Column::from_sort_key(order_by)
            .map(|column| Self::new(column, SortDirection::parse(direction)))
    }

    /// `"<column> <direction>"`
    #[must_use]
    pub fn to_sql(self) -> String {
        format!("{} {}", self.column.as_sql(), self.direction.as_sql())
    }
}

/// 1-based page window
///
/// Page size is expected to be clamped by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PagingWindow {
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Row offset of the first record on this page, `None` for a degenerate window
    #[must_use]
    pub fn offset(self) -> Option<u64> {
        if self.page == 0 || self.page_size == 0 {
            return None;
        }
        Some(u64::from(self.page - 1) * u64::from(self.page_size))
    }
}

/// One building block of a list/count query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPart {
    Equals(EqualityFilter),
    TextSearch(TextSearchFilter),
    Sort(SortSpec),
    Paging(PagingWindow),
}

impl QueryPart {
    /// Whether this part narrows the row set (as opposed to ordering or windowing it)
    #[must_use]
    pub const fn is_filter(&self) -> bool {
        matches!(self, QueryPart::Equals(_) | QueryPart::TextSearch(_))
    }
}

impl From<EqualityFilter> for QueryPart {
    fn from(filter: EqualityFilter) -> Self {
        QueryPart::Equals(filter)
    }
}

impl From<TextSearchFilter> for QueryPart {
    fn from(filter: TextSearchFilter) -> Self {
        QueryPart::TextSearch(filter)
    }
}

impl From<SortSpec> for QueryPart {
    fn from(sort: SortSpec) -> Self {
        QueryPart::Sort(sort)
    }
}

impl From<PagingWindow> for QueryPart {
    fn from(window: PagingWindow) -> Self {
        QueryPart::Paging(window)
    }
}

/// Clauses produced by [`DDayQueryBuilder`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuiltQuery {
    /// AND-joined predicates, empty when there are no filters
    pub where_clause: String,
    /// `"<column> <direction>"` without the `ORDER BY` keyword
    pub order_clause: Option<String>,
    /// `"LIMIT n OFFSET m"`
    pub limit_clause: Option<String>,
    /// Values for every `?`, in placeholder order
    pub params: Vec<QueryValue>,
}

impl BuiltQuery {
    /// Full SELECT statement
    ///
    /// `default_order` is used when no sort part was supplied.
    #[must_use]
    pub fn select_sql(&self, base: &str, default_order: &str) -> String {
        let mut sql = base.to_string();
        if !self.where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(self.order_clause.as_deref().unwrap_or(default_order));
        if let Some(limit) = &self.limit_clause {
            sql.push(' ');
            sql.push_str(limit);
        }
        sql
    }

    /// COUNT statement over the same WHERE clause
    ///
    /// Ordering and paging never affect a count, so they are left out.
    #[must_use]
    pub fn count_sql(&self, base: &str) -> String {
        if self.where_clause.is_empty() {
            base.to_string()
        } else {
            format!("{base} WHERE {}", self.where_clause)
        }
    }
}

/// Builder turning [`QueryPart`]s into SQL clauses and bound parameters
#[derive(Debug, Clone, Default)]
pub struct DDayQueryBuilder {
    conditions: Vec<String>,
    params: Vec<QueryValue>,
    order: Option<String>,
    limit: Option<String>,
}

impl DDayQueryBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with every part applied in order
    #[must_use]
    pub fn from_parts(parts: &[QueryPart]) -> Self {
        parts.iter().fold(Self::new(), Self::add)
    }

    /// Apply one part
    ///
    /// A later sort or paging part replaces an earlier one.
    #[must_use]
    pub fn add(mut self, part: &QueryPart) -> Self {
        match part {
            QueryPart::Equals(filter) => {
                self.conditions.push(format!(
                    "{} {} ?",
                    filter.column.as_sql(),
                    filter.op.as_sql()
                ));
                self.params.push(filter.value.clone());
            }
            QueryPart::TextSearch(filter) => {
                self.conditions.push(filter.template().to_string());
                self.params.extend_from_slice(filter.args());
            }
            QueryPart::Sort(sort) => {
                self.order = Some(sort.to_sql());
            }
            QueryPart::Paging(window) => {
                self.limit = window
                    .offset()
                    .map(|offset| format!("LIMIT {} OFFSET {offset}", window.page_size));
            }
        }
        self
    }

    /// Produce the clauses
    #[must_use]
    pub fn build(self) -> BuiltQuery {
        BuiltQuery {
            where_clause: self.conditions.join(" AND "),
            order_clause: self.order,
            limit_clause: self.limit,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "SELECT * FROM ddays_tb";
    const COUNT: &str = "SELECT COUNT(*) FROM ddays_tb";
    const DEFAULT_ORDER: &str = "d_target_date ASC";

    #[test]
    fn test_empty_parts_emit_no_where() {
        let built = DDayQueryBuilder::from_parts(&[]).build();

        assert!(built.where_clause.is_empty());
        assert!(built.order_clause.is_none());
        assert!(built.limit_clause.is_none());
        assert!(built.params.is_empty());
        assert_eq!(
            built.select_sql(BASE, DEFAULT_ORDER),
            "SELECT * FROM ddays_tb ORDER BY d_target_date ASC"
        );
        assert_eq!(built.count_sql(COUNT), COUNT);
    }

    #[test]
    fn test_equality_filter() {
        let parts: Vec<QueryPart> =
            vec![EqualityFilter::equals(Column::Category, Category::Study).into()];
        let built = DDayQueryBuilder::from_parts(&parts).build();

        assert_eq!(built.where_clause, "d_category = ?");
        assert_eq!(built.params, vec![QueryValue::Text("학업".to_string())]);
    }

    #[test]
    fn test_text_search_binds_pattern_twice() {
        let parts: Vec<QueryPart> = vec![TextSearchFilter::title_or_memo("exam").into()];
        let built = DDayQueryBuilder::from_parts(&parts).build();

        assert_eq!(built.where_clause, "(d_title LIKE ? OR d_memo LIKE ?)");
        assert_eq!(
            built.params,
            vec![
                QueryValue::Text("%exam%".to_string()),
                QueryValue::Text("%exam%".to_string())
            ]
        );
    }

    #[test]
    fn test_search_text_never_reaches_sql() {
        let hostile = "x'); DROP TABLE ddays_tb; --";
        let parts: Vec<QueryPart> = vec![TextSearchFilter::title_or_memo(hostile).into()];
        let built = DDayQueryBuilder::from_parts(&parts).build();

        assert!(!built.where_clause.contains("DROP"));
        assert!(!built.select_sql(BASE, DEFAULT_ORDER).contains("DROP"));
    }

    #[test]
    fn test_filters_join_with_and_in_supplied_order() {
        let parts: Vec<QueryPart> = vec![
            TextSearchFilter::title_or_memo("trip").into(),
            EqualityFilter::equals(Column::Category, Category::Personal).into(),
            EqualityFilter::equals(Column::IsImportant, true).into(),
        ];
        let built = DDayQueryBuilder::from_parts(&parts).build();

        assert_eq!(
            built.where_clause,
            "(d_title LIKE ? OR d_memo LIKE ?) AND d_category = ? AND d_is_important = ?"
        );
        assert_eq!(built.params.len(), 4);
        assert_eq!(built.params[2], QueryValue::Text("개인".to_string()));
        assert_eq!(built.params[3], QueryValue::Bool(true));
    }

    #[test]
    fn test_sort_and_paging() {
        let parts: Vec<QueryPart> = vec![
            SortSpec::new(Column::Title, SortDirection::Desc).into(),
            PagingWindow::new(3, 20).into(),
        ];
        let built = DDayQueryBuilder::from_parts(&parts).build();

        assert_eq!(
            built.select_sql(BASE, DEFAULT_ORDER),
            "SELECT * FROM ddays_tb ORDER BY d_title DESC LIMIT 20 OFFSET 40"
        );
    }

    #[test]
    fn test_first_page_has_zero_offset() {
        let parts = [QueryPart::from(PagingWindow::new(1, 10))];
        let built = DDayQueryBuilder::from_parts(&parts).build();
        assert_eq!(built.limit_clause.as_deref(), Some("LIMIT 10 OFFSET 0"));
    }

    #[test]
    fn test_degenerate_paging_is_unbounded() {
        for window in [PagingWindow::new(0, 10), PagingWindow::new(1, 0)] {
            let built = DDayQueryBuilder::from_parts(&[QueryPart::Paging(window)]).build();
            assert!(built.limit_clause.is_none());
        }
    }

    #[test]
    fn test_last_sort_wins() {
        let parts: Vec<QueryPart> = vec![
            SortSpec::new(Column::Title, SortDirection::Asc).into(),
            SortSpec::new(Column::CreatedAt, SortDirection::Desc).into(),
        ];
        let built = DDayQueryBuilder::from_parts(&parts).build();
        assert_eq!(built.order_clause.as_deref(), Some("d_created_at DESC"));
    }

    #[test]
    fn test_count_ignores_sort_and_paging() {
        let filter: QueryPart = EqualityFilter::equals(Column::IsImportant, false).into();
        let with_window = DDayQueryBuilder::from_parts(&[
            filter.clone(),
            SortSpec::new(Column::Title, SortDirection::Desc).into(),
            PagingWindow::new(2, 5).into(),
        ])
        .build();
        let filters_only = DDayQueryBuilder::from_parts(&[filter]).build();

        assert_eq!(with_window.count_sql(COUNT), filters_only.count_sql(COUNT));
        assert_eq!(
            filters_only.count_sql(COUNT),
            "SELECT COUNT(*) FROM ddays_tb WHERE d_is_important = ?"
        );
        assert_eq!(with_window.params, filters_only.params);
    }

    #[test]
    fn test_sort_key_allow_list() {
        assert_eq!(Column::from_sort_key("TITLE"), Some(Column::Title));
        assert_eq!(Column::from_sort_key("target_date"), Some(Column::TargetDate));
        assert_eq!(Column::from_sort_key("memo"), None);
        assert_eq!(Column::from_sort_key("d_title"), None);
        assert_eq!(Column::from_sort_key("title; DROP TABLE ddays_tb"), None);
    }

    #[test]
    fn test_sort_spec_parse() {
        let sort = SortSpec::parse("created_at", "DESC").unwrap();
        assert_eq!(sort.to_sql(), "d_created_at DESC");

        let sort = SortSpec::parse("title", "sideways").unwrap();
        assert_eq!(sort.direction, SortDirection::Asc);

        assert!(SortSpec::parse("unknown", "ASC").is_none());
    }

    #[test]
    fn test_sort_direction_is_case_sensitive() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("Desc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse(" DESC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse(""), SortDirection::Asc);
    }

    fn arb_part() -> impl Strategy<Value = QueryPart> {
        prop_oneof![
            "[a-z]{0,8}".prop_map(|s| QueryPart::from(TextSearchFilter::title_or_memo(&s))),
            any::<bool>()
                .prop_map(|b| QueryPart::from(EqualityFilter::equals(Column::IsImportant, b))),
            (0usize..4).prop_map(|i| {
                QueryPart::from(EqualityFilter::equals(Column::Category, Category::ALL[i]))
            }),
            any::<bool>().prop_map(|desc| {
                let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
                QueryPart::from(SortSpec::new(Column::TargetDate, direction))
            }),
            (0u32..50, 0u32..=100).prop_map(|(p, s)| QueryPart::from(PagingWindow::new(p, s))),
        ]
    }

    proptest! {
        #[test]
        fn prop_build_is_deterministic(parts in proptest::collection::vec(arb_part(), 0..8)) {
            let first = DDayQueryBuilder::from_parts(&parts).build();
            let second = DDayQueryBuilder::from_parts(&parts).build();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_placeholders_match_params(parts in proptest::collection::vec(arb_part(), 0..8)) {
            let built = DDayQueryBuilder::from_parts(&parts).build();
            let placeholders = built.where_clause.matches('?').count();
            prop_assert_eq!(placeholders, built.params.len());
        }

        #[test]
        fn prop_offset_math(page in 1u32..10_000, size in 1u32..=100) {
            let window = PagingWindow::new(page, size);
            prop_assert_eq!(window.offset(), Some(u64::from(page - 1) * u64::from(size)));
        }
    }
}
