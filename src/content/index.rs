//! Metadata index for listing pages

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::frontmatter::FrontMatter;
use super::slug;
use super::walker;
use crate::helpers::{epoch, parse_date_string, EPOCH_DATE};

/// Listing metadata of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    /// Date as written, or the epoch sentinel when absent
    pub date: String,
    pub excerpt: String,
    pub thumbnail: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    /// Collection the document belongs to, for combined indexes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip)]
    pub sort_key: NaiveDateTime,
}

impl PostMeta {
    /// Build listing metadata from front-matter, applying per-field defaults
    pub fn from_frontmatter(slug: &str, fm: FrontMatter) -> Self {
        let title = fm.title_or(slug::label(slug));
        let thumbnail = fm.image().unwrap_or_default().to_string();
        let sort_key = date_sort_key(fm.date.as_deref());
        Self {
            slug: slug.to_string(),
            title,
            date: fm.date.unwrap_or_else(|| EPOCH_DATE.to_string()),
            excerpt: fm.excerpt.unwrap_or_default(),
            thumbnail,
            tags: fm.tags,
            category: fm.category.filter(|c| !c.is_empty()),
            collection: None,
            sort_key,
        }
    }
}

/// Sort key for a front-matter date.
///
/// Missing dates sort as the epoch; unparsable ones as the minimum date, after everything else.
pub fn date_sort_key(date: Option<&str>) -> NaiveDateTime {
    match date {
        None => epoch(),
        Some(s) => parse_date_string(s).unwrap_or(NaiveDateTime::MIN),
    }
}

/// Walk a collection root and collect front-matter of every document, newest first.
///
/// Bodies are read but never compiled. Equal dates keep walk order.
pub fn build_index(root: &Path, extension: &str) -> Vec<PostMeta> {
    let mut metas = Vec::new();

    for entry in walker::walk(root, extension) {
        let raw = match fs::read_to_string(&entry.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", entry.path, e);
                continue;
            }
        };
        let (fm, _body) = FrontMatter::parse(&raw);
        metas.push(PostMeta::from_frontmatter(&entry.slug(extension), fm));
    }

    sort_by_date_desc(&mut metas);
    metas
}

/// Stable sort, newest first
pub fn sort_by_date_desc(metas: &mut [PostMeta]) {
    metas.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
}

/// Find a document's metadata by slug
pub fn find_meta<'a>(index: &'a [PostMeta], slug: &str) -> Option<&'a PostMeta> {
    index.iter().find(|m| m.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_build_index_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a/b.mdx",
            "---\ntitle: \"Foo\"\ndate: \"2024-01-01\"\n---\nBody",
        );
        write(dir.path(), "c.mdx", "No front-matter here.");

        let index = build_index(dir.path(), "mdx");
        assert_eq!(index.len(), 2);

        assert_eq!(index[0].slug, "a/b");
        assert_eq!(index[0].title, "Foo");
        assert_eq!(index[0].date, "2024-01-01");

        assert_eq!(index[1].slug, "c");
        assert_eq!(index[1].title, "c");
        assert_eq!(index[1].date, EPOCH_DATE);
        assert_eq!(index[1].excerpt, "");
        assert!(index[1].tags.is_empty());
        assert_eq!(index[1].category, None);
    }

    #[test]
    fn test_sorted_newest_first_and_bad_dates_last() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "old.mdx", "---\ndate: 2020-05-01\n---\n");
        write(dir.path(), "new.mdx", "---\ndate: 2024-05-01\n---\n");
        write(dir.path(), "bad.mdx", "---\ndate: someday\n---\n");
        write(dir.path(), "none.mdx", "body only");

        let slugs: Vec<String> = build_index(dir.path(), "mdx")
            .into_iter()
            .map(|m| m.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old", "none", "bad"]);
    }

    #[test]
    fn test_index_is_sorted_and_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..12 {
            let date = if i % 3 == 0 { "2024-01-01" } else { "2023-06-15" };
            write(
                dir.path(),
                &format!("d{}/p{}.mdx", i % 4, i),
                &format!("---\ntitle: p{}\ndate: {}\n---\n", i, date),
            );
        }

        let first = build_index(dir.path(), "mdx");
        let second = build_index(dir.path(), "mdx");
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].sort_key >= w[1].sort_key));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut metas: Vec<PostMeta> = ["x", "y", "z"]
            .iter()
            .map(|s| {
                PostMeta::from_frontmatter(
                    s,
                    FrontMatter {
                        date: Some("2024-02-02".to_string()),
                        ..Default::default()
                    },
                )
            })
            .collect();
        metas.push(PostMeta::from_frontmatter(
            "newest",
            FrontMatter {
                date: Some("2025-01-01".to_string()),
                ..Default::default()
            },
        ));

        sort_by_date_desc(&mut metas);
        let slugs: Vec<&str> = metas.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "x", "y", "z"]);
    }

    #[test]
    fn test_missing_root_gives_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_index(&dir.path().join("missing"), "mdx").is_empty());
    }

    #[test]
    fn test_find_meta() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guide/start.mdx", "---\ntitle: Start\n---\n");
        let index = build_index(dir.path(), "mdx");
        assert_eq!(find_meta(&index, "guide/start").unwrap().title, "Start");
        assert!(find_meta(&index, "guide").is_none());
    }
}
