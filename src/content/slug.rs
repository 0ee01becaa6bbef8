//! Slug derivation from content paths, and the way back

use std::path::{Path, PathBuf};

use crate::error::ContentError;

/// Derive a slug from path segments relative to a collection root.
///
/// Segments are joined with `/` and the `.{extension}` suffix of the final
/// segment is stripped: `["a", "b.mdx"]` becomes `a/b`.
pub fn resolve<S: AsRef<str>>(segments: &[S], extension: &str) -> String {
    let suffix = format!(".{}", extension);
    let mut parts: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
    if let Some(last) = parts.last_mut() {
        if let Some(stem) = last.strip_suffix(suffix.as_str()) {
            *last = stem;
        }
    }
    parts.join("/")
}

/// Check that every segment of a slug names a plain file or directory.
///
/// Slugs reach us from route parameters, so anything that could step outside
/// the collection root is refused.
pub fn validate(slug: &str) -> Result<Vec<&str>, ContentError> {
    let invalid = || ContentError::InvalidSlug(slug.to_string());

    if slug.is_empty() {
        return Err(invalid());
    }

    let segments: Vec<&str> = slug.split('/').collect();
    for seg in &segments {
        let bad = seg.is_empty()
            || *seg == "."
            || *seg == ".."
            || seg.contains('\\')
            || seg.contains('\0')
            || seg.contains(':');
        if bad {
            return Err(invalid());
        }
    }
    Ok(segments)
}

/// Map a slug back to its file under `root`: segments are joined with the
/// platform separator and the extension is appended.
pub fn to_file_path(root: &Path, slug: &str, extension: &str) -> Result<PathBuf, ContentError> {
    let segments = validate(slug)?;
    let (last, dirs) = segments
        .split_last()
        .ok_or_else(|| ContentError::InvalidSlug(slug.to_string()))?;

    let mut path = root.to_path_buf();
    for dir in dirs {
        path.push(dir);
    }
    path.push(format!("{}.{}", last, extension));
    Ok(path)
}

/// Human label for a document without a title: its last slug segment
pub fn label(slug: &str) -> &str {
    slug.rsplit('/').next().unwrap_or(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(&["a", "b.mdx"], "mdx"), "a/b");
        assert_eq!(resolve(&["c.mdx"], "mdx"), "c");
        assert_eq!(resolve(&["x", "y", "z.mdx"], "mdx"), "x/y/z");
        // only the trailing extension goes
        assert_eq!(resolve(&["v1.2.mdx"], "mdx"), "v1.2");
        assert_eq!(resolve::<&str>(&[], "mdx"), "");
    }

    #[test]
    fn test_round_trip() {
        let root = Path::new("/srv/content/topics");
        for segments in [vec!["c"], vec!["a", "b"], vec!["安全", "初回", "顔合わせ"]] {
            let with_ext: Vec<String> = segments
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    if i + 1 == segments.len() {
                        format!("{}.mdx", s)
                    } else {
                        s.to_string()
                    }
                })
                .collect();
            let slug = resolve(&with_ext, "mdx");

            let mut expected = root.to_path_buf();
            for seg in &with_ext {
                expected.push(seg);
            }
            assert_eq!(to_file_path(root, &slug, "mdx").unwrap(), expected);
        }
    }

    #[test]
    fn test_rejects_traversal() {
        let root = Path::new("/srv/content");
        for slug in [
            "..",
            "../secret",
            "a/../../etc/passwd",
            "a/./b",
            "",
            "a//b",
            "/etc/passwd",
            "a\\..\\b",
            "C:/windows",
        ] {
            assert!(
                matches!(
                    to_file_path(root, slug, "mdx"),
                    Err(ContentError::InvalidSlug(_))
                ),
                "slug {:?} should be rejected",
                slug
            );
        }
    }

    #[test]
    fn test_dots_inside_names_are_fine() {
        let root = Path::new("/srv");
        assert_eq!(
            to_file_path(root, "notes/v1..2", "mdx").unwrap(),
            Path::new("/srv/notes/v1..2.mdx")
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(label("a/b"), "b");
        assert_eq!(label("c"), "c");
    }
}
