//! Query parameters for the user list endpoint
//!
//! Every parameter arrives as a raw string and is coerced leniently: a
//! malformed value falls back to its default instead of rejecting the
//! request. A repeated key keeps its first value; unknown keys are ignored.
//!
//! # Example
//!
//! ```rust
//! use user_service::handlers::ListUsersQuery;
//! use user_service::repository::OrderDirection;
//!
//! let query = ListUsersQuery::default()
//!     .with_sort("age desc")
//!     .with_page("3")
//!     .with_limit("20");
//!
//! assert_eq!(query.order_by(), ("age".to_string(), OrderDirection::Descending));
//! assert_eq!(query.pagination().offset, 40);
//! ```

use crate::repository::{FilterCondition, OrderDirection, Pagination};

/// Column used when `sort` is absent or blank
pub const DEFAULT_SORT: &str = "name";

/// Page size used when `limit` is absent or unusable
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw query string of `GET /users`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub age: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl<K, V> FromIterator<(K, V)> for ListUsersQuery
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "age" => &mut query.age,
                "sort" => &mut query.sort,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// Parse an integer parameter, treating absent or malformed input as zero
fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0)
}

impl ListUsersQuery {
    #[must_use]
    pub fn with_age(mut self, age: impl Into<String>) -> Self {
        self.age = Some(age.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Age to filter on, only when strictly positive
    pub fn age_filter(&self) -> Option<i64> {
        Some(lenient_int(self.age.as_deref())).filter(|age| *age > 0)
    }

    /// Column and direction to sort by
    ///
    /// Accepts `"col"`, `"col asc"`, `"col desc"` and `"-col"`. Column names
    /// are case-insensitive and returned lowercased, matching how PostgreSQL
    /// folds unquoted identifiers; checking them against the schema is left
    /// to the store.
    pub fn order_by(&self) -> (String, OrderDirection) {
        let raw = self.sort.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return (DEFAULT_SORT.to_string(), OrderDirection::Ascending);
        }

        let (column, direction) = if let Some(column) = raw.strip_prefix('-') {
            (column, OrderDirection::Descending)
        } else {
            match raw.rsplit_once(char::is_whitespace) {
                Some((column, dir)) if dir.eq_ignore_ascii_case("desc") => {
                    (column, OrderDirection::Descending)
                }
                Some((column, dir)) if dir.eq_ignore_ascii_case("asc") => {
                    (column, OrderDirection::Ascending)
                }
                _ => (raw, OrderDirection::Ascending),
            }
        };
        (column.trim().to_ascii_lowercase(), direction)
    }

    /// 1-indexed page number; absent or malformed input yields 0
    pub fn page_number(&self) -> u64 {
        u64::try_from(lenient_int(self.page.as_deref())).unwrap_or(0)
    }

    /// Page size; absent, zero, negative or malformed input yields [`DEFAULT_LIMIT`]
    pub fn items_per_page(&self) -> u64 {
        match u64::try_from(lenient_int(self.limit.as_deref())) {
            Ok(0) | Err(_) => DEFAULT_LIMIT,
            Ok(limit) => limit,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page_number(), self.items_per_page())
    }

    pub fn filters(&self) -> Vec<FilterCondition> {
        self.age_filter()
            .map(|age| FilterCondition::eq("age", age))
            .into_iter()
            .collect()
    }
}
