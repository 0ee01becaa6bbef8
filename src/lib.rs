//! kiji: a static site generator for MDX article collections and JSON-backed
//! listing pages
//!
//! Documents live in named collections, each compiled against its own set of
//! allowed components. Listing pages read pre-built JSON datasets and support
//! category filters, free-text search and pagination.

pub mod commands;
pub mod components;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod listing;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use config::DatasetConfig;
use content::{Collection, MdxCompiler};

/// A kiji site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Root of the MDX collections
    pub content_dir: PathBuf,
    /// Directory holding the JSON datasets
    pub data_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let data_dir = base_dir.join(&config.data_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            data_dir,
            public_dir,
        }
    }

    /// One collection per configured entry, in configuration order
    pub fn collections(&self) -> Vec<Collection> {
        self.config
            .collections
            .iter()
            .map(|c| Collection::from_config(c, &self.content_dir, &self.config.extension))
            .collect()
    }

    /// Compiler configured from the `highlight` settings
    pub fn compiler(&self) -> MdxCompiler {
        let highlight = &self.config.highlight;
        MdxCompiler::with_options(&highlight.theme, highlight.line_number, highlight.enable)
    }

    /// Location of a dataset file
    pub fn dataset_path(&self, dataset: &DatasetConfig) -> PathBuf {
        self.data_dir.join(&dataset.file)
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
