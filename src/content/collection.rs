//! Content collections: named roots of MDX documents

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::compiler::{CompiledDocument, Heading, MdxCompiler};
use super::frontmatter::FrontMatter;
use super::index::{self, PostMeta};
use super::{slug, walker};
use crate::components::{render_html, ComponentRegistry};
use crate::config::CollectionConfig;
use crate::error::{CompileError, ContentError};

/// A document read from disk, not yet compiled
#[derive(Debug, Clone)]
pub struct ContentDocument {
    pub slug: String,
    pub frontmatter: FrontMatter,
    /// Markdown and component source, verbatim
    pub body: String,
    pub path: PathBuf,
}

impl ContentDocument {
    /// Listing metadata of this document
    pub fn meta(&self) -> PostMeta {
        PostMeta::from_frontmatter(&self.slug, self.frontmatter.clone())
    }
}

/// A compiled and rendered document, ready for a page template
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub meta: PostMeta,
    pub frontmatter: FrontMatter,
    pub html: String,
    pub headings: Vec<Heading>,
}

/// A named root directory whose documents share a component registry and a route
#[derive(Debug, Clone)]
pub struct Collection {
    pub name: String,
    pub root: PathBuf,
    /// URL prefix, without slashes
    pub route: String,
    pub label: String,
    pub extension: String,
    pub registry: ComponentRegistry,
    pub pr_notice: bool,
}

impl Collection {
    pub fn new(name: &str, root: impl Into<PathBuf>, route: &str, extension: &str, registry: ComponentRegistry) -> Self {
        Self {
            name: name.to_string(),
            root: root.into(),
            route: route.to_string(),
            label: name.to_string(),
            extension: extension.to_string(),
            registry,
            pr_notice: false,
        }
    }

    /// Build a collection from configuration, resolving its root under `content_dir`
    pub fn from_config(config: &CollectionConfig, content_dir: &Path, extension: &str) -> Self {
        let label = if config.label.is_empty() {
            config.name.clone()
        } else {
            config.label.clone()
        };
        Self {
            name: config.name.clone(),
            root: content_dir.join(&config.dir),
            route: config.route.trim_matches('/').to_string(),
            label,
            extension: extension.to_string(),
            registry: ComponentRegistry::with_builtins(&config.components),
            pr_notice: config.pr_notice,
        }
    }

    /// Every document file of the collection
    pub fn entries(&self) -> Vec<walker::ContentEntry> {
        walker::walk(&self.root, &self.extension)
    }

    /// All slugs, sorted
    pub fn slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self
            .entries()
            .iter()
            .map(|e| e.slug(&self.extension))
            .collect();
        slugs.sort();
        slugs
    }

    /// File backing a slug; traversal attempts are rejected
    pub fn file_path(&self, slug: &str) -> Result<PathBuf, ContentError> {
        slug::to_file_path(&self.root, slug, &self.extension)
    }

    /// Whether `path` still lies under the root once links are resolved.
    /// Paths that do not exist are left to the read to report.
    fn resolves_inside(&self, path: &Path) -> bool {
        match (path.canonicalize(), self.root.canonicalize()) {
            (Ok(path), Ok(root)) => path.starts_with(root),
            _ => true,
        }
    }

    /// Read and split one document
    pub fn load(&self, slug: &str) -> Result<ContentDocument, ContentError> {
        let not_found = || ContentError::NotFound {
            collection: self.name.clone(),
            slug: slug.to_string(),
        };
        let path = self.file_path(slug)?;
        if !self.resolves_inside(&path) {
            tracing::warn!("{:?} links outside {:?}, ignoring it", path, self.root);
            return Err(not_found());
        }
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound || path.is_dir() => {
                return Err(not_found())
            }
            Err(source) => return Err(ContentError::Io { path, source }),
        };

        let (frontmatter, body) = FrontMatter::parse(&raw);
        Ok(ContentDocument {
            slug: slug.to_string(),
            frontmatter,
            body: body.to_string(),
            path,
        })
    }

    /// Metadata index, newest first, tagged with the collection name
    pub fn index(&self) -> Vec<PostMeta> {
        let mut metas = index::build_index(&self.root, &self.extension);
        for meta in &mut metas {
            meta.collection = Some(self.name.clone());
        }
        metas
    }

    /// Compile a document against this collection's registry
    pub fn compile(&self, doc: &ContentDocument, compiler: &MdxCompiler) -> Result<CompiledDocument, CompileError> {
        compiler.compile(&doc.body, &self.registry)
    }

    /// Load, compile and render a document in one go
    pub fn render(&self, slug: &str, compiler: &MdxCompiler) -> Result<RenderedDocument, ContentError> {
        let doc = self.load(slug)?;
        let compiled = self.compile(&doc, compiler)?;
        let html = render_html(&compiled, &self.registry);
        let mut meta = doc.meta();
        meta.collection = Some(self.name.clone());
        Ok(RenderedDocument {
            meta,
            frontmatter: doc.frontmatter,
            html,
            headings: compiled.headings,
        })
    }
}

/// Find a document in the first collection that has it
pub fn find_document<'a>(
    collections: &'a [Collection],
    slug: &str,
) -> Result<(&'a Collection, ContentDocument), ContentError> {
    let mut last_err = None;
    for collection in collections {
        match collection.load(slug) {
            Ok(doc) => return Ok((collection, doc)),
            Err(e) if e.is_not_found() => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| ContentError::NotFound {
        collection: String::new(),
        slug: slug.to_string(),
    }))
}

/// One index over several collections, newest first. Ties keep collection order.
pub fn combined_index(collections: &[Collection]) -> Vec<PostMeta> {
    let mut metas: Vec<PostMeta> = collections.iter().flat_map(Collection::index).collect();
    index::sort_by_date_desc(&mut metas);
    metas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn compiler() -> MdxCompiler {
        MdxCompiler::with_options("InspiredGitHub", false, false)
    }

    fn collection(root: &Path, name: &str, components: &[&str]) -> Collection {
        Collection::new(
            name,
            root.join(name),
            name,
            "mdx",
            ComponentRegistry::with_builtins(components),
        )
    }

    #[test]
    fn test_load_and_render() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "topics/safety/first.mdx",
            "---\ntitle: 初回の注意\ndate: 2024-04-01\n---\n<InlineToc />\n\n## 場所\n\n人の多い場所で。\n",
        );
        let topics = collection(dir.path(), "topics", &["InlineToc"]);

        assert_eq!(topics.slugs(), vec!["safety/first"]);
        let doc = topics.render("safety/first", &compiler()).unwrap();
        assert_eq!(doc.meta.title, "初回の注意");
        assert_eq!(doc.meta.collection.as_deref(), Some("topics"));
        assert!(doc.html.contains("inline-toc"));
        assert_eq!(doc.headings.len(), 1);
    }

    #[test]
    fn test_missing_and_invalid_slugs_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "secret.mdx", "outside the collection");
        let articles = collection(dir.path(), "articles", &[]);

        for slug in ["nope", "../secret", "a/../../secret", ""] {
            let err = articles.load(slug).unwrap_err();
            assert!(err.is_not_found(), "{:?} gave {:?}", slug, err);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "secret.mdx", "outside the collection");
        write(dir.path(), "articles/real.mdx", "inside");
        std::os::unix::fs::symlink(
            dir.path().join("secret.mdx"),
            dir.path().join("articles/leak.mdx"),
        )
        .unwrap();
        let articles = collection(dir.path(), "articles", &[]);

        assert_eq!(articles.slugs(), vec!["real"]);
        assert!(articles.load("leak").unwrap_err().is_not_found());
        assert!(articles.load("real").is_ok());
    }

    #[test]
    fn test_directory_slug_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "articles/a.mdx/b.mdx", "nested");
        let articles = collection(dir.path(), "articles", &[]);
        assert!(articles.load("a").unwrap_err().is_not_found());
        assert!(articles.load("a.mdx/b").is_ok());
    }

    #[test]
    fn test_unregistered_component_is_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guides/g.mdx", "<ServiceCard />\n");
        let guides = collection(dir.path(), "guides", &[]);
        assert!(matches!(
            guides.render("g", &compiler()),
            Err(ContentError::Compile(CompileError::UnregisteredComponent { .. }))
        ));
    }

    #[test]
    fn test_find_document_prefers_first_collection() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "articles/shared.mdx", "---\ntitle: from articles\n---\n");
        write(dir.path(), "topics/shared.mdx", "---\ntitle: from topics\n---\n");
        write(dir.path(), "topics/only.mdx", "---\ntitle: only topics\n---\n");
        let collections = vec![
            collection(dir.path(), "articles", &[]),
            collection(dir.path(), "topics", &[]),
        ];

        let (found_in, doc) = find_document(&collections, "shared").unwrap();
        assert_eq!(found_in.name, "articles");
        assert_eq!(doc.frontmatter.title.as_deref(), Some("from articles"));

        let (found_in, _) = find_document(&collections, "only").unwrap();
        assert_eq!(found_in.name, "topics");

        assert!(find_document(&collections, "missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_combined_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "articles/a.mdx", "---\ndate: 2024-01-01\n---\n");
        write(dir.path(), "topics/t.mdx", "---\ndate: 2024-06-01\n---\n");
        write(dir.path(), "topics/same.mdx", "---\ndate: 2024-01-01\n---\n");
        let collections = vec![
            collection(dir.path(), "articles", &[]),
            collection(dir.path(), "topics", &[]),
        ];

        let index = combined_index(&collections);
        let order: Vec<(&str, &str)> = index
            .iter()
            .map(|m| (m.collection.as_deref().unwrap(), m.slug.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("topics", "t"), ("articles", "a"), ("topics", "same")]
        );
    }

    #[test]
    fn test_missing_root_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let c = collection(dir.path(), "nothing", &[]);
        assert!(c.slugs().is_empty());
        assert!(c.index().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = CollectionConfig {
            name: "guides".to_string(),
            dir: "GuideArticles".to_string(),
            route: "/guide/".to_string(),
            label: String::new(),
            components: vec!["InlineToc".to_string()],
            pr_notice: true,
        };
        let c = Collection::from_config(&config, Path::new("/site/src/content"), "mdx");
        assert_eq!(c.root, Path::new("/site/src/content/GuideArticles"));
        assert_eq!(c.route, "guide");
        assert_eq!(c.label, "guides");
        assert!(c.registry.contains("InlineToc"));
        assert!(c.pr_notice);
    }
}
