//! Loading pre-built JSON datasets

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::DatasetError;

/// Items of a dataset. A broken file gives no items and keeps the error for display.
#[derive(Debug)]
pub struct Dataset<T> {
    pub items: Vec<T>,
    pub error: Option<DatasetError>,
}

impl<T> Dataset<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
        }
    }
}

/// Load a JSON array of records. Never fails; see [`Dataset::error`].
pub fn load_dataset<T: DeserializeOwned>(path: &Path) -> Dataset<T> {
    match read_dataset(path) {
        Ok(items) => Dataset { items, error: None },
        Err(e) => {
            tracing::warn!("{}", e);
            Dataset {
                items: Vec::new(),
                error: Some(e),
            }
        }
    }
}

fn read_dataset<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let raw = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source: serde_json::Error| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(&raw).map_err(parse_err)?;
    if !value.is_array() {
        return Err(DatasetError::NotAnArray {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_value(value).map_err(parse_err)
}

/// Items that carry a slug
pub trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for super::ListingItem {
    fn slug(&self) -> &str {
        &self.slug
    }
}

pub fn find_by_slug<'a, T: Slugged>(items: &'a [T], slug: &str) -> Option<&'a T> {
    items.iter().find(|item| item.slug() == slug)
}

/// The `n` newest items
pub fn latest<T: super::Listable + Clone>(items: &[T], n: usize) -> Vec<T> {
    let mut sorted = items.to_vec();
    super::sort_by_date_desc(&mut sorted);
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingItem;

    #[test]
    fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interviews.json");
        fs::write(
            &path,
            r#"[{"slug": "a", "title": "A", "date": "2024-01-01"},
                {"slug": "b", "title": "B", "date": "2024-03-01"},
                {"slug": "c", "title": "C"}]"#,
        )
        .unwrap();

        let dataset: Dataset<ListingItem> = load_dataset(&path);
        assert!(dataset.is_ok());
        assert_eq!(dataset.items.len(), 3);
        assert_eq!(find_by_slug(&dataset.items, "b").unwrap().title, "B");
        assert!(find_by_slug(&dataset.items, "z").is_none());

        let newest: Vec<String> = latest(&dataset.items, 2).into_iter().map(|i| i.slug).collect();
        assert_eq!(newest, vec!["b", "a"]);
    }

    #[test]
    fn test_null_fields_do_not_break_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.json");
        fs::write(
            &path,
            r#"[{"slug": "a", "title": "A"}, {"slug": "b", "title": "B", "tags": null}]"#,
        )
        .unwrap();

        let dataset: Dataset<ListingItem> = load_dataset(&path);
        assert!(dataset.is_ok());
        assert_eq!(dataset.items.len(), 2);
        assert!(dataset.items[1].tags.is_empty());
    }

    #[test]
    fn test_broken_datasets_are_empty_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_json = dir.path().join("bad.json");
        fs::write(&not_json, "{ nope").unwrap();
        let object = dir.path().join("object.json");
        fs::write(&object, r#"{"slug": "a"}"#).unwrap();

        let d: Dataset<ListingItem> = load_dataset(&not_json);
        assert!(d.items.is_empty());
        assert!(matches!(d.error, Some(DatasetError::Parse { .. })));

        let d: Dataset<ListingItem> = load_dataset(&object);
        assert!(matches!(d.error, Some(DatasetError::NotAnArray { .. })));

        let d: Dataset<ListingItem> = load_dataset(&dir.path().join("missing.json"));
        assert!(matches!(d.error, Some(DatasetError::Read { .. })));
    }
}
