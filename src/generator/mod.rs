//! Generator module - renders pages with the built-in Tera templates and
//! writes the static site

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;

use crate::config::{DatasetConfig, DatasetKind};
use crate::content::{slug, Collection, MdxCompiler, PostMeta, RenderedDocument};
use crate::error::PageError;
use crate::helpers::{document_url, url_for, EPOCH_DATE};
use crate::listing::{
    self, active_ctas, find_by_slug, glossary, is_all_category, load_dataset, video_src,
    GlossaryItem, ListingItem, ListingQuery, Page, CATEGORY_ALL, CATEGORY_ALL_JA,
};
use crate::templates::{
    CardData, CategoryLink, CtaData, DocumentData, GlossaryData, GlossaryEntryData,
    GlossaryGroupData, HomeSection, InterviewData, ListingData, NavItem, PagerData, SiteData,
    TemplateRenderer,
};
use crate::Site;

/// Cards per home page section
const HOME_LATEST: usize = 4;

/// How pager links are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `?q=..&cat=..&page=N`, answered by the server
    Query,
    /// `/<route>/page/N/`, written as files
    Static,
}

/// Page renderer and static site writer
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    compiler: MdxCompiler,
    collections: Vec<Collection>,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new(site.config.tz())?,
            compiler: site.compiler(),
            collections: site.collections(),
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection_by_route(&self, route: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.route == route)
    }

    pub fn dataset_by_route(&self, route: &str) -> Option<&DatasetConfig> {
        self.site
            .config
            .datasets
            .iter()
            .find(|d| d.route.trim_matches('/') == route)
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<()> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        write_page(&public_dir.join("index.html"), &self.home_page()?)?;
        write_page(&public_dir.join("404.html"), &self.not_found_page())?;

        let mut failed = 0;
        for collection in &self.collections {
            failed += self.generate_collection(collection)?;
        }
        for dataset in &self.site.config.datasets {
            self.generate_dataset(dataset)?;
        }

        if failed > 0 {
            anyhow::bail!("{} document(s) failed to compile", failed);
        }
        Ok(())
    }

    /// Documents, listing pages and `index.json` of one collection.
    /// Returns the number of documents that failed to compile.
    fn generate_collection(&self, collection: &Collection) -> Result<usize> {
        let out_dir = self.site.public_dir.join(&collection.route);
        let mut failed = 0;

        let slugs = collection.slugs();
        for slug in &slugs {
            match self.document_page(collection, slug) {
                Ok(html) => write_page(&slug_dir(&out_dir, slug).join("index.html"), &html)?,
                Err(PageError::Compile(e)) => {
                    tracing::error!("{}/{}: {}", collection.name, slug, e);
                    failed += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let index = collection.index();
        let pages = listing::total_pages(index.len(), self.site.config.per_page);
        for n in 1..=pages {
            let query = ListingQuery {
                page: n,
                ..Default::default()
            };
            let html = self.collection_page(collection, &query, LinkStyle::Static)?;
            write_page(&page_path(&out_dir, n), &html)?;
        }

        fs::write(out_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;

        tracing::info!(
            "Generated {} documents in {}",
            slugs.len() - failed,
            collection.name
        );
        Ok(failed)
    }

    /// Listing pages of one dataset, a copy of its JSON and interview pages
    fn generate_dataset(&self, dataset: &DatasetConfig) -> Result<()> {
        let route = dataset.route.trim_matches('/');
        let out_dir = self.site.public_dir.join(route);
        let source = self.site.dataset_path(dataset);

        if source.is_file() {
            let target = self.site.public_dir.join(&dataset.file);
            if target != source {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&source, &target)?;
            }
        }

        if dataset.kind == DatasetKind::Glossary {
            let html = self.dataset_page(dataset, &ListingQuery::default(), LinkStyle::Static)?;
            return write_page(&out_dir.join("index.html"), &html);
        }

        let items = load_dataset::<ListingItem>(&source).items;
        let pages = listing::total_pages(items.len(), self.page_size(dataset));
        for n in 1..=pages {
            let query = ListingQuery {
                page: n,
                ..Default::default()
            };
            let html = self.dataset_page(dataset, &query, LinkStyle::Static)?;
            write_page(&page_path(&out_dir, n), &html)?;
        }

        if dataset.kind == DatasetKind::Interviews {
            for item in items.iter().filter(|i| i.video.is_some()) {
                if let Err(e) = slug::validate(&item.slug) {
                    tracing::warn!("Skipping {} entry: {}", dataset.name, e);
                    continue;
                }
                match self.interview_page(dataset, &item.slug, 0) {
                    Ok(html) => write_page(&slug_dir(&out_dir, &item.slug).join("index.html"), &html)?,
                    Err(PageError::NotFound) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tracing::info!("Generated {} listing ({} items)", dataset.name, items.len());
        Ok(())
    }

    /// Home page: the newest entries of every collection and listing
    pub fn home_page(&self) -> Result<String, PageError> {
        let mut sections = Vec::new();

        for collection in &self.collections {
            let cards = collection
                .index()
                .iter()
                .take(HOME_LATEST)
                .map(|meta| self.meta_card(collection, meta))
                .collect();
            sections.push(HomeSection {
                label: collection.label.clone(),
                href: url_for(&self.site.config, &format!("{}/", collection.route)),
                cards,
            });
        }

        for dataset in &self.site.config.datasets {
            if dataset.kind == DatasetKind::Glossary {
                continue;
            }
            let items = load_dataset::<ListingItem>(&self.site.dataset_path(dataset)).items;
            let cards = listing::latest(&items, HOME_LATEST)
                .iter()
                .map(|item| self.item_card(dataset, item))
                .collect();
            sections.push(HomeSection {
                label: label_of(dataset),
                href: url_for(&self.site.config, &format!("{}/", dataset.route.trim_matches('/'))),
                cards,
            });
        }

        let mut context = self.context();
        context.insert("sections", &sections);
        Ok(self.renderer.render("home.html", &context)?)
    }

    /// A compiled document; unknown slugs are not found, compile errors surface as such
    pub fn document_page(&self, collection: &Collection, slug: &str) -> Result<String, PageError> {
        let doc = collection.render(slug, &self.compiler)?;
        let data = self.document_data(collection, doc);

        let mut context = self.context();
        context.insert("doc", &data);
        Ok(self.renderer.render("document.html", &context)?)
    }

    /// Listing of a collection's documents
    pub fn collection_page(
        &self,
        collection: &Collection,
        query: &ListingQuery,
        style: LinkStyle,
    ) -> Result<String, PageError> {
        let index = collection.index();
        let categories = listing::categories(&index);
        let page = listing::apply(&index, query, self.site.config.per_page);
        let cards = page
            .items
            .iter()
            .map(|meta| self.meta_card(collection, meta))
            .collect();

        let data = self.listing_data(
            &collection.label,
            &collection.route,
            query,
            categories,
            cards,
            &page,
            style,
            false,
        );
        self.render_listing(&data)
    }

    /// Listing of a JSON dataset
    pub fn dataset_page(
        &self,
        dataset: &DatasetConfig,
        query: &ListingQuery,
        style: LinkStyle,
    ) -> Result<String, PageError> {
        if dataset.kind == DatasetKind::Glossary {
            return self.glossary_page(dataset, query);
        }

        let loaded = load_dataset::<ListingItem>(&self.site.dataset_path(dataset));
        let categories = listing::categories(&loaded.items);
        let page = listing::apply(&loaded.items, query, self.page_size(dataset));
        let cards = page
            .items
            .iter()
            .map(|item| self.item_card(dataset, item))
            .collect();

        let data = self.listing_data(
            &label_of(dataset),
            dataset.route.trim_matches('/'),
            query,
            categories,
            cards,
            &page,
            style,
            loaded.error.is_some(),
        );
        self.render_listing(&data)
    }

    fn glossary_page(&self, dataset: &DatasetConfig, query: &ListingQuery) -> Result<String, PageError> {
        let loaded = load_dataset::<GlossaryItem>(&self.site.dataset_path(dataset));
        let cat = if query.has_category() {
            query.cat.as_str()
        } else {
            CATEGORY_ALL
        };

        let mut matched = glossary::filter(&loaded.items, &query.q, cat);
        glossary::sort_by_reading(&mut matched);
        let groups = glossary::group(&matched)
            .into_iter()
            .map(|(key, items)| GlossaryGroupData {
                key: key.to_string(),
                items: items.into_iter().map(glossary_entry).collect(),
            })
            .collect();

        let route = dataset.route.trim_matches('/');
        let mut names = vec![CATEGORY_ALL_JA.to_string()];
        names.extend(glossary::categories(&loaded.items));

        let data = GlossaryData {
            label: label_of(dataset),
            action: url_for(&self.site.config, &format!("{}/", route)),
            q: query.q.clone(),
            cat_param: query.has_category().then(|| query.cat.clone()),
            categories: self.category_links(route, query, names),
            groups,
            total: matched.len(),
            error: loaded.error.is_some(),
        };

        let mut context = self.context();
        context.insert("glossary", &data);
        context.insert("filters", &data);
        Ok(self.renderer.render("glossary.html", &context)?)
    }

    /// Interview video page starting `start` seconds in. Items without a video are not found.
    pub fn interview_page(&self, dataset: &DatasetConfig, slug: &str, start: u64) -> Result<String, PageError> {
        let loaded = load_dataset::<ListingItem>(&self.site.dataset_path(dataset));
        let item = find_by_slug(&loaded.items, slug).ok_or(PageError::NotFound)?;
        let video = item
            .video
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(PageError::NotFound)?;

        let active = active_ctas(&item.ctas, start as f64);
        let ctas = item
            .ctas
            .iter()
            .map(|cta| CtaData {
                label: cta.label.clone(),
                href: cta.href.clone(),
                start: cta.start.unwrap_or(0.0).max(0.0),
                end: cta.end.map(|e| e.to_string()).unwrap_or_default(),
                active: active.contains(&cta),
            })
            .collect();

        let data = InterviewData {
            title: non_empty(&item.title).unwrap_or_else(|| "Interview".to_string()),
            excerpt: item.excerpt.clone(),
            video_src: video_src(video, start),
            poster: item.image().map(str::to_string),
            start_at: start,
            ctas,
            back_href: url_for(&self.site.config, &format!("{}/", dataset.route.trim_matches('/'))),
        };

        let mut context = self.context();
        context.insert("interview", &data);
        Ok(self.renderer.render("interview.html", &context)?)
    }

    pub fn not_found_page(&self) -> String {
        self.renderer
            .render("not_found.html", &self.context())
            .unwrap_or_else(|e| {
                tracing::error!("Failed to render not-found page: {}", e);
                "<h1>Not Found</h1>".to_string()
            })
    }

    /// Error page shown in place of a document that failed to compile
    pub fn error_page(&self, message: &str) -> String {
        let mut context = self.context();
        context.insert("message", message);
        self.renderer
            .render("error.html", &context)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to render error page: {}", e);
                "<h1>Error</h1>".to_string()
            })
    }

    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context
    }

    fn site_data(&self) -> SiteData {
        let config = &self.site.config;
        let mut nav: Vec<NavItem> = self
            .collections
            .iter()
            .map(|c| NavItem {
                label: c.label.clone(),
                href: url_for(config, &format!("{}/", c.route)),
            })
            .collect();
        nav.extend(config.datasets.iter().map(|d| NavItem {
            label: label_of(d),
            href: url_for(config, &format!("{}/", d.route.trim_matches('/'))),
        }));

        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
            nav,
        }
    }

    fn document_data(&self, collection: &Collection, doc: RenderedDocument) -> DocumentData {
        let config = &self.site.config;
        DocumentData {
            title: doc.meta.title,
            date: dated(&doc.meta.date),
            excerpt: doc.meta.excerpt,
            image: non_empty(&doc.meta.thumbnail),
            category: doc.meta.category,
            tags: doc.meta.tags,
            html: doc.html,
            headings: doc.headings,
            collection_label: collection.label.clone(),
            collection_href: url_for(config, &format!("{}/", collection.route)),
            pr_notice: collection.pr_notice.then(|| config.pr_notice.clone()),
        }
    }

    fn meta_card(&self, collection: &Collection, meta: &PostMeta) -> CardData {
        CardData {
            title: meta.title.clone(),
            href: document_url(&self.site.config, &collection.route, &meta.slug),
            excerpt: meta.excerpt.clone(),
            image: non_empty(&meta.thumbnail),
            date: dated(&meta.date),
            category: meta.category.clone(),
            tags: meta.tags.clone(),
            reading_minutes: None,
        }
    }

    fn item_card(&self, dataset: &DatasetConfig, item: &ListingItem) -> CardData {
        let (route, reading_minutes) = match dataset.kind {
            DatasetKind::Articles => (
                dataset.link_route.as_deref().unwrap_or(&dataset.route),
                Some(item.reading_minutes()),
            ),
            _ => (dataset.route.as_str(), None),
        };
        CardData {
            title: item.title.clone(),
            href: document_url(&self.site.config, route, &item.slug),
            excerpt: item.excerpt.clone().unwrap_or_default(),
            image: item.image().map(str::to_string),
            date: item.date.as_deref().and_then(dated),
            category: item.category.clone(),
            tags: item.tags.clone(),
            reading_minutes,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn listing_data<T>(
        &self,
        label: &str,
        route: &str,
        query: &ListingQuery,
        categories: Vec<String>,
        cards: Vec<CardData>,
        page: &Page<T>,
        style: LinkStyle,
        error: bool,
    ) -> ListingData {
        let href = |n: usize| self.page_href(route, query, n, style);
        ListingData {
            label: label.to_string(),
            action: url_for(&self.site.config, &format!("{}/", route)),
            q: query.q.clone(),
            cat_param: query.has_category().then(|| query.cat.clone()),
            categories: self.category_links(route, query, categories),
            cards,
            pager: PagerData {
                current: page.current,
                total_pages: page.total_pages,
                total: page.total,
                prev_href: page.has_prev().then(|| href(page.current - 1)),
                next_href: page.has_next().then(|| href(page.current + 1)),
            },
            error,
        }
    }

    fn render_listing(&self, data: &ListingData) -> Result<String, PageError> {
        let mut context = self.context();
        context.insert("listing", data);
        context.insert("filters", data);
        Ok(self.renderer.render("listing.html", &context)?)
    }

    fn category_links(&self, route: &str, query: &ListingQuery, names: Vec<String>) -> Vec<CategoryLink> {
        let base = url_for(&self.site.config, &format!("{}/", route));
        names
            .into_iter()
            .map(|name| {
                let active = if is_all_category(&name) {
                    !query.has_category()
                } else {
                    name == query.cat
                };
                CategoryLink {
                    href: with_query(&base, &query.category_href(&name)),
                    name,
                    active,
                }
            })
            .collect()
    }

    fn page_href(&self, route: &str, query: &ListingQuery, n: usize, style: LinkStyle) -> String {
        let base = url_for(&self.site.config, &format!("{}/", route));
        match style {
            LinkStyle::Query => with_query(&base, &query.page_href(n)),
            LinkStyle::Static if n <= 1 => base,
            LinkStyle::Static => url_for(&self.site.config, &format!("{}/page/{}/", route, n)),
        }
    }

    fn page_size(&self, dataset: &DatasetConfig) -> usize {
        dataset.page_size.unwrap_or(self.site.config.per_page)
    }
}

fn glossary_entry(item: GlossaryItem) -> GlossaryEntryData {
    GlossaryEntryData {
        anchor: item.anchor(),
        term: item.term,
        reading: item.reading,
        desc: item.desc,
        category: item.category,
        synonyms: item.synonyms,
        badge: item.badge,
        updated_at: item.updated_at,
    }
}

fn label_of(dataset: &DatasetConfig) -> String {
    non_empty(&dataset.label).unwrap_or_else(|| dataset.name.clone())
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A displayable date; the epoch placeholder of undated documents is hidden
fn dated(date: &str) -> Option<String> {
    if date.is_empty() || date == EPOCH_DATE {
        None
    } else {
        Some(date.to_string())
    }
}

fn with_query(base: &str, query: &str) -> String {
    if query == "?" {
        base.to_string()
    } else {
        format!("{}{}", base, query)
    }
}

/// Output directory of a slug, one directory per segment
fn slug_dir(root: &Path, slug: &str) -> PathBuf {
    slug.split('/').fold(root.to_path_buf(), |dir, seg| dir.join(seg))
}

/// File of listing page `n`
fn page_path(root: &Path, n: usize) -> PathBuf {
    if n <= 1 {
        root.join("index.html")
    } else {
        root.join("page").join(n.to_string()).join("index.html")
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "src/content/topics/safety/first.mdx",
            "---\ntitle: 初回の注意\ndate: 2024-04-01\ncategory: 安全\n---\n<InlineToc />\n\n## 場所\n\n人の多い場所で。\n",
        );
        write(
            root,
            "src/content/articles/start.mdx",
            "---\ntitle: はじめに\n---\n本文\n",
        );
        write(
            root,
            "src/content/GuideArticles/broken.mdx",
            "<ServiceCard />\n",
        );
        write(
            root,
            "public/interviews.json",
            r#"[{"slug": "aya", "title": "Ayaさん", "video": "/v/aya.mp4", "date": "2024-02-01",
                 "ctas": [{"label": "公式", "href": "https://example.com", "start": 30}]},
                {"slug": "novideo", "title": "No video"}]"#,
        );
        let topics: Vec<String> = (0..12)
            .map(|i| {
                format!(
                    r#"{{"slug": "t{0}", "title": "Topic {0}", "category": "{1}", "date": "2024-01-{2:02}"}}"#,
                    i,
                    if i % 2 == 0 { "X" } else { "Y" },
                    i + 1
                )
            })
            .collect();
        write(root, "public/topics.json", &format!("[{}]", topics.join(",")));
        write(root, "public/guides.json", "{ broken");
        write(
            root,
            "public/glossary.json",
            r#"[{"term": "顔合わせ", "reading": "かおあわせ", "desc": "初回の面談", "category": "初回"},
                {"term": "お手当", "reading": "おてあて", "desc": "対価"}]"#,
        );
        let site = Site::new(root).unwrap();
        (dir, site)
    }

    #[test]
    fn test_document_page() {
        let (_dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();
        let topics = generator.collection_by_route("topics").unwrap();

        let html = generator.document_page(topics, "safety/first").unwrap();
        assert!(html.contains("<h1>初回の注意</h1>"));
        assert!(html.contains("2024/04/01"));
        assert!(html.contains("inline-toc"));
        assert!(html.contains("pr-notice"));

        assert!(matches!(
            generator.document_page(topics, "../articles/start"),
            Err(PageError::NotFound)
        ));
    }

    #[test]
    fn test_unregistered_component_is_compile_error() {
        let (_dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();
        let guides = generator.collection_by_route("guide").unwrap();
        assert!(matches!(
            generator.document_page(guides, "broken"),
            Err(PageError::Compile(_))
        ));
    }

    #[test]
    fn test_dataset_listing_query() {
        let (_dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();
        let topics = generator.dataset_by_route("topic-list").unwrap();

        let mut params = std::collections::HashMap::new();
        params.insert("cat".to_string(), "Y".to_string());
        params.insert("page".to_string(), "9".to_string());
        let query = ListingQuery::from_map(&params);

        let html = generator.dataset_page(topics, &query, LinkStyle::Query).unwrap();
        assert!(html.contains("6件"));
        assert!(html.contains("Topic 11"));
        assert!(!html.contains("Topic 10"));
        assert!(html.contains(r#"href="/topics/t11""#));
        assert!(html.contains("約2分"));
    }

    #[test]
    fn test_broken_dataset_shows_error_flag() {
        let (_dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();
        let guides = generator.dataset_by_route("guides").unwrap();
        let html = generator
            .dataset_page(guides, &ListingQuery::default(), LinkStyle::Query)
            .unwrap();
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("0件"));
    }

    #[test]
    fn test_interview_page() {
        let (_dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();
        let interviews = generator.dataset_by_route("interviews").unwrap();

        let html = generator.interview_page(interviews, "aya", 42).unwrap();
        assert!(html.contains(r#"src="/v/aya.mp4#t=42""#));
        assert!(!html.contains(" hidden>"));

        let html = generator.interview_page(interviews, "aya", 0).unwrap();
        assert!(html.contains(" hidden>"));

        assert!(matches!(
            generator.interview_page(interviews, "novideo", 0),
            Err(PageError::NotFound)
        ));
        assert!(matches!(
            generator.interview_page(interviews, "nobody", 0),
            Err(PageError::NotFound)
        ));
    }

    #[test]
    fn test_glossary_page() {
        let (_dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();
        let glossary = generator.dataset_by_route("glossary").unwrap();
        let html = generator
            .dataset_page(glossary, &ListingQuery::default(), LinkStyle::Static)
            .unwrap();
        assert!(html.find("お手当").unwrap() < html.find("顔合わせ").unwrap());
        assert!(html.contains(r#"id="group-あ""#));
    }

    #[test]
    fn test_generate_writes_site() {
        let (dir, site) = fixture();
        let generator = Generator::new(&site).unwrap();

        // the broken guide is reported after everything else is written
        assert!(generator.generate().is_err());

        let public = dir.path().join("dist");
        for rel in [
            "index.html",
            "404.html",
            "topics/safety/first/index.html",
            "topics/index.json",
            "manual/start/index.html",
            "topic-list/index.html",
            "topic-list/page/2/index.html",
            "interviews/aya/index.html",
            "glossary/index.html",
            "topics.json",
        ] {
            assert!(public.join(rel).is_file(), "missing {}", rel);
        }
        assert!(!public.join("interviews/novideo/index.html").exists());
        assert!(!public.join("guide/broken/index.html").exists());

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("topics/index.json")).unwrap()).unwrap();
        assert_eq!(index[0]["slug"], "safety/first");
        assert_eq!(index[0]["collection"], "topics");
    }

    #[test]
    fn test_interview_slugs_stay_inside_output() {
        let (dir, site) = fixture();
        write(
            dir.path(),
            "public/interviews.json",
            r#"[{"slug": "../../escaped", "video": "/v.mp4"}, {"slug": "", "video": "/e.mp4"},
                {"slug": "aya", "title": "Ayaさん", "video": "/v/aya.mp4"}]"#,
        );
        let generator = Generator::new(&site).unwrap();
        let interviews = generator.dataset_by_route("interviews").unwrap();
        generator.generate_dataset(interviews).unwrap();

        let public = dir.path().join("dist");
        assert!(!dir.path().join("escaped").exists());
        assert!(!public.join("escaped").exists());
        assert!(public.join("interviews/aya/index.html").is_file());

        let listing = fs::read_to_string(public.join("interviews/index.html")).unwrap();
        assert!(listing.contains("Ayaさん"));
        assert!(!listing.contains("<video"));
    }
}
