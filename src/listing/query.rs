//! Listing page state carried in the query string (`q`, `cat`, `page`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::filter::{is_all_category, CATEGORY_ALL_JA};
use crate::helpers::build_query;

/// Raw query parameters of a listing request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub cat: Option<String>,
    pub page: Option<String>,
}

/// Normalized listing state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingQuery {
    /// Search text, trimmed and lowercased
    pub q: String,
    /// Category filter; the sentinel when absent
    pub cat: String,
    /// Requested page, at least 1
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            cat: CATEGORY_ALL_JA.to_string(),
            page: 1,
        }
    }
}

impl ListingQuery {
    pub fn from_params(params: &ListingParams) -> Self {
        let cat = match params.cat.as_deref() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => CATEGORY_ALL_JA.to_string(),
        };
        Self {
            q: params.q.as_deref().unwrap_or_default().trim().to_lowercase(),
            cat,
            page: parse_page(params.page.as_deref()),
        }
    }

    pub fn from_map(map: &HashMap<String, String>) -> Self {
        Self::from_params(&ListingParams {
            q: map.get("q").cloned(),
            cat: map.get("cat").cloned(),
            page: map.get("page").cloned(),
        })
    }

    /// Whether a category filter is active
    pub fn has_category(&self) -> bool {
        !is_all_category(&self.cat)
    }

    /// Query string for another page of the same results
    pub fn page_href(&self, page: usize) -> String {
        let page = page.to_string();
        self.href_with(None, None, Some(&page))
    }

    /// Query string selecting a category; the page is dropped
    pub fn category_href(&self, cat: &str) -> String {
        self.href_with(None, Some(cat), None)
    }

    /// Query string keeping the current search and category, with overrides.
    /// The sentinel category and page 1 are left out.
    pub fn href_with(&self, q: Option<&str>, cat: Option<&str>, page: Option<&str>) -> String {
        let q = q.unwrap_or(&self.q);
        let cat = cat.unwrap_or(&self.cat);
        let cat = if is_all_category(cat) { None } else { Some(cat) };
        let page = page.filter(|p| *p != "1");
        build_query(&[("q", Some(q)), ("cat", cat), ("page", page)])
    }
}

/// Parse a page number; anything unusable becomes 1
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.max(1) as usize)
        .unwrap_or(1)
}

/// Listing state owned by one listing view. Narrowing the results always
/// returns to the first page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingState {
    query: ListingQuery,
}

impl ListingState {
    pub fn new(query: ListingQuery) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn set_search(&mut self, text: &str) {
        let text = text.trim().to_lowercase();
        if text != self.query.q {
            self.query.q = text;
            self.query.page = 1;
        }
    }

    pub fn set_category(&mut self, cat: &str) {
        if cat != self.query.cat {
            self.query.cat = cat.to_string();
            self.query.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }
}
