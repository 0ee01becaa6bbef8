//! Typed errors for the content pipeline and listing datasets

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while looking up or compiling a single document
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no document `{slug}` in collection `{collection}`")]
    NotFound { collection: String, slug: String },

    #[error("invalid slug `{0}`")]
    InvalidSlug(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl ContentError {
    /// Whether the error should surface as a "not found" page
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::NotFound { .. } | ContentError::InvalidSlug(_) | ContentError::Io { .. }
        )
    }
}

/// Errors raised by the MDX compiler
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("component <{name}> is not registered for this collection")]
    UnregisteredComponent { name: String },

    #[error("component <{name}> is never closed")]
    UnclosedComponent { name: String },

    #[error("unexpected closing tag </{name}>")]
    UnexpectedClose { name: String },

    #[error("component <{name}> could not be read")]
    MalformedComponent { name: String },
}

/// Errors raised while loading a JSON listing dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset {path:?} is not a JSON array")]
    NotAnArray { path: PathBuf },
}

/// Why a page could not be produced
#[derive(Debug, Error)]
pub enum PageError {
    /// Shown as the not-found page
    #[error("page not found")]
    NotFound,

    /// Shown as an error page instead of a partial document
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

impl From<ContentError> for PageError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::Compile(e) => PageError::Compile(e),
            other if other.is_not_found() => PageError::NotFound,
            other => PageError::Render(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_errors_map_to_pages() {
        let not_found = ContentError::NotFound {
            collection: "topics".to_string(),
            slug: "x".to_string(),
        };
        assert!(matches!(PageError::from(not_found), PageError::NotFound));
        assert!(matches!(
            PageError::from(ContentError::InvalidSlug("..".to_string())),
            PageError::NotFound
        ));

        let compile = ContentError::from(CompileError::UnregisteredComponent {
            name: "Ad".to_string(),
        });
        assert_eq!(compile.to_string(), "component <Ad> is not registered for this collection");
        assert!(matches!(PageError::from(compile), PageError::Compile(_)));
    }
}
