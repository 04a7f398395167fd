use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// Common query parameters for list endpoints.
///
/// Pagination via `page`/`page_size`, free-text filtering via `search`,
/// and sorting via `ordering` (`-` prefix for descending). Which columns
/// `search` and `ordering` apply to is decided per resource.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListParams {
    /// Page number, defaulting to 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, defaulting to 10 and clamped between 1 and 100.
    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(10).clamp(1, 100)
    }

    /// Row offset derived from page and page size.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }

    /// Trimmed search term, if one was supplied.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Resolve an `ordering` query value against a whitelist of
/// `(api name, sql expression)` pairs. A `-` prefix flips the direction.
/// Unknown names fall back to `default` so user input never reaches SQL.
pub fn order_clause(
    requested: Option<&str>,
    allowed: &[(&str, &str)],
    default: &'static str,
) -> String {
    let Some(raw) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
        return default.to_string();
    };

    let (name, desc) = match raw.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };

    for (api_name, sql) in allowed {
        if *api_name == name {
            return if desc {
                format!("{} DESC", sql)
            } else {
                format!("{} ASC", sql)
            };
        }
    }

    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
        assert_eq!(params.offset(), 0);
        assert!(params.search().is_none());
    }

    #[test]
    fn test_list_params_page_size_clamped() {
        let params = ListParams {
            page_size: Some(500),
            ..Default::default()
        };
        assert_eq!(params.page_size(), 100);

        let params = ListParams {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(params.page_size(), 1);
    }

    #[test]
    fn test_list_params_offset() {
        let params = ListParams {
            page: Some(3),
            page_size: Some(25),
            ..Default::default()
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_list_params_negative_page() {
        let params = ListParams {
            page: Some(-2),
            ..Default::default()
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_list_params_search_trimmed() {
        let params = ListParams {
            search: Some("  alice  ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search(), Some("alice"));

        let params = ListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search(), None);
    }

    #[test]
    fn test_list_params_deserialize_empty_strings() {
        let params: ListParams =
            serde_json::from_str(r#"{"page":"","page_size":""}"#).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn test_pagination_meta_total_pages() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);

        let meta = PaginationMeta::new(1, 10, 30);
        assert_eq!(meta.total_pages, 3);

        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_order_clause_default() {
        let allowed = [("name", "u.first_name"), ("created_at", "s.created_at")];
        assert_eq!(order_clause(None, &allowed, "u.first_name ASC"), "u.first_name ASC");
        assert_eq!(
            order_clause(Some(""), &allowed, "u.first_name ASC"),
            "u.first_name ASC"
        );
    }

    #[test]
    fn test_order_clause_ascending_and_descending() {
        let allowed = [("name", "u.first_name")];
        assert_eq!(
            order_clause(Some("name"), &allowed, "u.id ASC"),
            "u.first_name ASC"
        );
        assert_eq!(
            order_clause(Some("-name"), &allowed, "u.id ASC"),
            "u.first_name DESC"
        );
    }

    #[test]
    fn test_order_clause_rejects_unknown_columns() {
        let allowed = [("name", "u.first_name")];
        assert_eq!(
            order_clause(Some("password; DROP TABLE users"), &allowed, "u.id ASC"),
            "u.id ASC"
        );
    }
}
