//! Pure filter, search and pagination over listing records

use serde::Serialize;

use super::item::Listable;
use super::query::ListingQuery;

/// Category value meaning "no filter"
pub const CATEGORY_ALL: &str = "all";
/// Category value meaning "no filter", as shown on Japanese listing pages
pub const CATEGORY_ALL_JA: &str = "すべて";

pub fn is_all_category(category: &str) -> bool {
    category == CATEGORY_ALL || category == CATEGORY_ALL_JA
}

/// Keep items whose category equals `category` exactly.
///
/// A sentinel passes everything; items without a category never match anything else.
pub fn filter_by_category<T: Listable + Clone>(items: &[T], category: &str) -> Vec<T> {
    if is_all_category(category) {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.category() == Some(category))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, excerpt and tags
pub fn search<T: Listable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.haystack().to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Stable sort, newest first
pub fn sort_by_date_desc<T: Listable>(items: &mut [T]) {
    items.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed, after clamping
    pub current: usize,
    pub total_pages: usize,
    /// Item count before pagination
    pub total: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

/// Number of pages for `count` items; at least one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out a 1-indexed page, clamping `page` into range
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let current = page.clamp(1, total_pages);
    let start = ((current - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        current,
        total_pages,
        total: items.len(),
        page_size,
    }
}

/// Category, then search, then newest first, then the requested page
pub fn apply<T: Listable + Clone>(items: &[T], query: &ListingQuery, page_size: usize) -> Page<T> {
    let mut matched = search(&filter_by_category(items, &query.cat), &query.q);
    sort_by_date_desc(&mut matched);
    paginate(&matched, page_size, query.page)
}

/// The sentinel first, then every distinct category in first-seen order
pub fn categories<T: Listable>(items: &[T]) -> Vec<String> {
    let mut out = vec![CATEGORY_ALL_JA.to_string()];
    for item in items {
        if let Some(cat) = item.category().filter(|c| !c.is_empty()) {
            if !out.iter().any(|c| c == cat) {
                out.push(cat.to_string());
            }
        }
    }
    out
}
