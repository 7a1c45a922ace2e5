//! Pagination, ordering and filtering types for repository queries
//!
//! # Example
//!
//! ```rust
//! use user_service::repository::{FilterCondition, OrderDirection, Pagination};
//!
//! let pagination = Pagination::page(2, 10);
//! assert_eq!(pagination.offset, 10);
//!
//! let filters = vec![FilterCondition::eq("age", 30_i64)];
//! let order_by = Some(("name", OrderDirection::Ascending));
//! # let _ = (filters, order_by);
//! ```

use std::fmt;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// SQL keyword for this direction
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Pagination parameters for limiting query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    #[must_use]
    pub const fn first_page(limit: u64) -> Self {
        Self { offset: 0, limit }
    }

    /// Pagination for a 1-indexed page number
    ///
    /// Page 0 is treated as page 1, so the offset never goes negative.
    ///
    /// ```rust
    /// use user_service::repository::Pagination;
    ///
    /// assert_eq!(Pagination::page(3, 20).offset, 40);
    /// assert_eq!(Pagination::page(0, 20).offset, 0);
    /// ```
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

/// A value that can be bound in a filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Equality filter, rendered as `field = value`
///
/// ```rust
/// use user_service::repository::{FilterCondition, FilterValue};
///
/// let filter = FilterCondition::eq("age", 30_i64);
/// assert_eq!(filter.field, "age");
/// assert_eq!(filter.value, FilterValue::Integer(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The value the field must equal
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}
