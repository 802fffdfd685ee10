pub mod auth;
pub mod dashboard;
pub mod events;
pub mod roles;
pub mod transactions;
pub mod users;

use serde::Deserialize;

/// Distinguishes an absent JSON field from an explicit `null`.
///
/// Partial updates need the difference: `null` clears a nullable column,
/// absent leaves it untouched. Use with `#[serde(default, with = ...)]` on an
/// `Option<Option<T>>` field.
pub mod serde_double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination query params, shared by every list endpoint.
///
/// Clients have historically sent both `pageNo` and `PageNo`; accept both,
/// respond with the PascalCase envelope fields.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "pageNo", alias = "PageNo")]
    pub page_no: Option<i64>,
    #[serde(rename = "pageSize", alias = "PageSize")]
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// Resolved (page_no, page_size, offset). Out-of-range values clamp
    /// rather than error.
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page_no = self.page_no.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page_no, page_size, (page_no - 1) * page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.resolve(), (1, 10, 0));
    }

    #[test]
    fn page_query_clamps() {
        let q = PageQuery {
            page_no: Some(0),
            page_size: Some(10_000),
        };
        assert_eq!(q.resolve(), (1, MAX_PAGE_SIZE, 0));

        let q = PageQuery {
            page_no: Some(3),
            page_size: Some(20),
        };
        assert_eq!(q.resolve(), (3, 20, 40));
    }
}
