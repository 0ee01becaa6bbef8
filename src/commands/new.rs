//! Create a new document

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::slug;
use crate::Site;

/// Create a document in `collection` (the first configured one by default).
///
/// The slug defaults to the slugified title, or a timestamp when that is empty.
pub fn create_document(
    site: &Site,
    title: &str,
    collection: Option<&str>,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let collections = site.collections();
    let target = match collection {
        Some(name) => collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown collection: {}", name))?,
        None => collections
            .first()
            .ok_or_else(|| anyhow::anyhow!("No collections configured"))?,
    };

    let now = chrono::Local::now();
    let slug = match slug {
        Some(s) => s.trim_matches('/').to_string(),
        None => {
            let s = ::slug::slugify(title);
            if s.is_empty() {
                now.format("%Y%m%d%H%M%S").to_string()
            } else {
                s
            }
        }
    };
    slug::validate(&slug)?;

    let file_path = target.file_path(&slug)?;
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // JSON strings are valid YAML scalars
    let content = format!(
        "---\ntitle: {}\ndate: {}\nexcerpt: ''\ncategory:\ntags: []\n---\n\n",
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_document(&site, "Hello: World", None, None).unwrap();
        assert_eq!(path, site.content_dir.join("articles/hello-world.mdx"));

        let doc = site.collections()[0].load("hello-world").unwrap();
        assert_eq!(doc.frontmatter.title_or(""), "Hello: World");

        let path = create_document(&site, "x", Some("topics"), Some("safety/first")).unwrap();
        assert_eq!(path, site.content_dir.join("topics/safety/first.mdx"));

        assert!(create_document(&site, "x", Some("topics"), Some("safety/first")).is_err());
        assert!(create_document(&site, "x", Some("nope"), None).is_err());
        assert!(create_document(&site, "x", None, Some("../escape")).is_err());
    }
}
