//! Pagination metadata for list responses.
//!
//! The base URL is supplied by the caller; nothing here looks at the current
//! request.

use serde::Serialize;

use crate::validation::ListQuery;

/// `pagination` object attached to list envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    /// Row count matching the filters, before pagination.
    pub total: i64,
    pub total_pages: i64,
    pub next_url: Option<String>,
    pub previous_url: Option<String>,
}

impl PaginationMeta {
    /// Build metadata for `query` given the filtered `total`.
    ///
    /// `base_url` is the absolute URL of the list endpoint without a query
    /// string. Active filters are carried over into the next/previous links.
    pub fn build(query: &ListQuery, total: i64, base_url: &str) -> Self {
        let limit = i64::from(query.limit.max(1));
        let total_pages = if total > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        let page = i64::from(query.page);

        let next_url = (page < total_pages).then(|| link(base_url, query, query.page + 1));
        let previous_url = (page > 1).then(|| link(base_url, query, query.page - 1));

        Self {
            page: query.page,
            limit: query.limit,
            total,
            total_pages,
            next_url,
            previous_url,
        }
    }
}

fn link(base_url: &str, query: &ListQuery, page: u32) -> String {
    let mut params = Vec::with_capacity(3);
    if let Some(status) = query.status {
        params.push(format!("status={status}"));
    }
    params.push(format!("page={page}"));
    params.push(format!("limit={}", query.limit));
    format!("{base_url}?{}", params.join("&"))
}
