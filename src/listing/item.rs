//! Listing records read from the pre-built JSON datasets

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::cta::AffiliateCta;
use crate::content::index::date_sort_key;
use crate::content::PostMeta;

/// Minimum reading time shown on a card
const MIN_READ_MINUTES: u32 = 2;
/// Words per minute used to estimate reading time
const WORDS_PER_MINUTE: f64 = 500.0;
/// Word count assumed when a record carries none
const DEFAULT_WORDS: u64 = 800;

/// Anything a listing page can filter, search and sort
pub trait Listable {
    fn category(&self) -> Option<&str>;

    /// Text searched by the free-text filter: title, excerpt and tags
    fn haystack(&self) -> String;

    fn sort_date(&self) -> NaiveDateTime;
}

/// Treats an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One card of a listing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingItem {
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub cover: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    /// Interview video URL
    pub video: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ctas: Vec<AffiliateCta>,
    pub read_minutes: Option<u32>,
    pub words: Option<u64>,

    /// Collection-specific fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ListingItem {
    /// Card image: `thumbnail`, then `cover`
    pub fn image(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .or(self.cover.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Reading time in minutes: `readMinutes`, else estimated from `words`
    pub fn reading_minutes(&self) -> u32 {
        self.read_minutes.unwrap_or_else(|| {
            let words = self.words.unwrap_or(DEFAULT_WORDS) as f64;
            ((words / WORDS_PER_MINUTE).round() as u32).max(MIN_READ_MINUTES)
        })
    }
}

impl Listable for ListingItem {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.excerpt.as_deref().unwrap_or_default(),
            self.tags.join(" ")
        )
    }

    fn sort_date(&self) -> NaiveDateTime {
        date_sort_key(self.date.as_deref())
    }
}

impl Listable for PostMeta {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.excerpt, self.tags.join(" "))
    }

    fn sort_date(&self) -> NaiveDateTime {
        self.sort_key
    }
}

impl From<PostMeta> for ListingItem {
    fn from(meta: PostMeta) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        Self {
            slug: meta.slug,
            title: meta.title,
            excerpt: non_empty(meta.excerpt),
            thumbnail: non_empty(meta.thumbnail),
            date: Some(meta.date),
            tags: meta.tags,
            category: meta.category,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let json = r#"[{"slug": "a", "title": "A"},
                       {"slug": "b", "title": null, "tags": null, "ctas": null}]"#;
        let items: Vec<ListingItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].slug, "b");
        assert!(items[1].title.is_empty());
        assert!(items[1].tags.is_empty());
        assert!(items[1].ctas.is_empty());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{
            "slug": "first",
            "title": "初めて",
            "thumbnail": null,
            "cover": "/c.jpg",
            "tags": ["安全"],
            "readMinutes": 5,
            "ctas": [{"label": "公式", "href": "https://example.com", "start": 10}],
            "rating": 4.5
        }"#;
        let item: ListingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image(), Some("/c.jpg"));
        assert_eq!(item.reading_minutes(), 5);
        assert_eq!(item.ctas.len(), 1);
        assert_eq!(item.extra.get("rating"), Some(&serde_json::json!(4.5)));
        assert_eq!(item.excerpt, None);
    }

    #[test]
    fn test_reading_minutes_estimate() {
        let mut item = ListingItem::default();
        assert_eq!(item.reading_minutes(), 2);
        item.words = Some(2600);
        assert_eq!(item.reading_minutes(), 5);
        item.words = Some(100);
        assert_eq!(item.reading_minutes(), 2);
    }

    #[test]
    fn test_haystack() {
        let item = ListingItem {
            title: "Alpha".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        assert_eq!(item.haystack(), "Alpha  a b");
    }
}
