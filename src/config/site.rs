//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub data_dir: String,
    pub public_dir: String,

    // Writing
    pub extension: String,
    #[serde(default)]
    pub highlight: HighlightConfig,
    pub pr_notice: String,

    // Listing pages
    pub per_page: usize,

    // Content sources
    pub collections: Vec<CollectionConfig>,
    pub datasets: Vec<DatasetConfig>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "kiji".to_string(),
            description: String::new(),
            language: "ja".to_string(),
            timezone: "Asia/Tokyo".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "src/content".to_string(),
            data_dir: "public".to_string(),
            public_dir: "dist".to_string(),

            extension: "mdx".to_string(),
            highlight: HighlightConfig::default(),
            pr_notice: "※本記事にはPR（アフィリエイトリンク）が含まれています。".to_string(),

            per_page: 9,

            collections: CollectionConfig::defaults(),
            datasets: DatasetConfig::defaults(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timezone used for date display, falling back to Asia/Tokyo
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using Asia/Tokyo", self.timezone);
            chrono_tz::Asia::Tokyo
        })
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Look up a dataset by name
    pub fn dataset(&self, name: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.name == name)
    }
}

/// A named directory of MDX documents sharing a component registry and a route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionConfig {
    pub name: String,
    /// Directory relative to `content_dir`
    pub dir: String,
    /// URL prefix, without slashes
    pub route: String,
    /// Display name on listing pages
    #[serde(default)]
    pub label: String,
    /// Components that documents of this collection may embed
    #[serde(default)]
    pub components: Vec<String>,
    /// Show the affiliate disclosure on each document
    #[serde(default)]
    pub pr_notice: bool,
}

impl CollectionConfig {
    fn new(name: &str, dir: &str, route: &str, label: &str, components: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            dir: dir.to_string(),
            route: route.to_string(),
            label: label.to_string(),
            components: components.iter().map(|c| c.to_string()).collect(),
            pr_notice: false,
        }
    }

    fn defaults() -> Vec<Self> {
        let mut topics = Self::new(
            "topics",
            "topics",
            "topics",
            "トピックス",
            &[
                "CalloutList",
                "AppCompareTable",
                "InlineToc",
                "CleanOjiAffiliateCard",
                "ServiceCard",
                "Image",
                "Link",
                "RelatedArticles",
            ],
        );
        topics.pr_notice = true;

        vec![
            Self::new("articles", "articles", "manual", "マニュアル", &["InlineToc"]),
            topics,
            Self::new("guides", "GuideArticles", "guide", "実践ガイド", &[]),
        ]
    }
}

/// What a listing dataset holds, which decides its detail pages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Video interviews with time-stamped calls to action
    Interviews,
    /// Cards linking into an MDX collection
    #[default]
    Articles,
    /// Glossary terms
    Glossary,
}

/// A pre-built JSON array of listing items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    pub name: String,
    /// File relative to `data_dir`
    pub file: String,
    /// URL prefix of the listing page, without slashes
    pub route: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: DatasetKind,
    /// Items per page; falls back to the site's `per_page`
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Route of the collection the cards link to (articles only)
    #[serde(default)]
    pub link_route: Option<String>,
}

impl DatasetConfig {
    fn defaults() -> Vec<Self> {
        vec![
            Self {
                name: "interviews".to_string(),
                file: "interviews.json".to_string(),
                route: "interviews".to_string(),
                label: "インタビュー".to_string(),
                kind: DatasetKind::Interviews,
                page_size: None,
                link_route: None,
            },
            Self {
                name: "guides".to_string(),
                file: "guides.json".to_string(),
                route: "guides".to_string(),
                label: "実践ガイド".to_string(),
                kind: DatasetKind::Articles,
                page_size: None,
                link_route: Some("guide".to_string()),
            },
            Self {
                name: "topics".to_string(),
                file: "topics.json".to_string(),
                route: "topic-list".to_string(),
                label: "トピックス".to_string(),
                kind: DatasetKind::Articles,
                page_size: None,
                link_route: Some("topics".to_string()),
            },
            Self {
                name: "glossary".to_string(),
                file: "glossary.json".to_string(),
                route: "glossary".to_string(),
                label: "用語集".to_string(),
                kind: DatasetKind::Glossary,
                page_size: None,
                link_route: None,
            },
        ]
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
}
