use serde::Deserialize;

use crate::config;
use crate::entity::EntityDef;
use crate::error::ApiError;

/// Wire-level query string of the list endpoint.
///
/// The admin client sends the sort selection as flattened keys
/// (`?sortBy.sort=name&sortBy.order=desc`), hence the renames.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(rename = "sortBy.sort")]
    pub sort: Option<String>,
    #[serde(rename = "sortBy.order")]
    pub order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Normalized list parameters: validated, defaulted, and with the sort
/// field resolved against the entity's allow-list. Only values of this type
/// reach the storage layer.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: &'static str,
    pub order: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl ListParams {
    pub fn from_query(def: &'static EntityDef, query: ListQuery) -> Result<Self, ApiError> {
        let pagination = &config::config().pagination;

        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::bad_request("page must be a positive integer"));
        }

        let mut limit = query.limit.unwrap_or(pagination.default_limit);
        if limit < 1 {
            return Err(ApiError::bad_request("limit must be a positive integer"));
        }
        if let Some(max) = pagination.max_limit {
            if limit > max {
                tracing::warn!("limit {} exceeds max {}, capping to max", limit, max);
                limit = max;
            }
        }

        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            search,
            sort: def.sort_field(query.sort.as_deref()),
            order: SortOrder::parse(query.order.as_deref()),
            page,
            limit,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BANNERS;

    fn query(page: Option<i64>, limit: Option<i64>) -> ListQuery {
        ListQuery {
            page,
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn applies_defaults() {
        let params = ListParams::from_query(&BANNERS, ListQuery::default()).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.sort, "id");
        assert_eq!(params.order, SortOrder::Asc);
        assert!(params.search.is_none());
    }

    #[test]
    fn rejects_non_positive_page_and_limit() {
        assert!(ListParams::from_query(&BANNERS, query(Some(0), None)).is_err());
        assert!(ListParams::from_query(&BANNERS, query(Some(-3), None)).is_err());
        assert!(ListParams::from_query(&BANNERS, query(None, Some(0))).is_err());
        assert!(ListParams::from_query(&BANNERS, query(None, Some(-1))).is_err());
    }

    #[test]
    fn caps_limit_at_configured_max() {
        let params = ListParams::from_query(&BANNERS, query(None, Some(100_000))).unwrap();
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_id() {
        let q = ListQuery {
            sort: Some("no_such_column".to_string()),
            order: Some("DESC".to_string()),
            ..Default::default()
        };
        let params = ListParams::from_query(&BANNERS, q).unwrap();
        assert_eq!(params.sort, "id");
        assert_eq!(params.order, SortOrder::Desc);
    }

    #[test]
    fn blank_search_means_no_narrowing() {
        let q = ListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let params = ListParams::from_query(&BANNERS, q).unwrap();
        assert!(params.search.is_none());
    }

    #[test]
    fn offset_math() {
        let params = ListParams::from_query(&BANNERS, query(Some(3), Some(25))).unwrap();
        assert_eq!(params.offset(), 50);
    }
}
