//! Built-in page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::Heading;
use crate::helpers::{escape_html, format_date_ja, strip_html, truncate_chars};

/// Template renderer with the embedded page templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded; dates display in `tz`
    pub fn new(tz: Tz) -> Result<Self> {
        let mut tera = Tera::default();

        // URLs and pre-rendered HTML go out as is; text is escaped with `esc`
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("pages/layout.html")),
            ("home.html", include_str!("pages/home.html")),
            ("document.html", include_str!("pages/document.html")),
            ("listing.html", include_str!("pages/listing.html")),
            ("glossary.html", include_str!("pages/glossary.html")),
            ("interview.html", include_str!("pages/interview.html")),
            ("not_found.html", include_str!("pages/not_found.html")),
            ("error.html", include_str!("pages/error.html")),
            // Partials
            ("partials/card.html", include_str!("pages/partials/card.html")),
            ("partials/pager.html", include_str!("pages/partials/pager.html")),
            (
                "partials/filters.html",
                include_str!("pages/partials/filters.html"),
            ),
        ])?;

        tera.register_filter("esc", esc_filter);
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter(
            "date_ja",
            move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let s = tera::try_get_value!("date_ja", "value", String, value);
                Ok(tera::Value::String(format_date_ja(&s, tz).unwrap_or(s)))
            },
        );

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::Null => String::new(),
        tera::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(escape_html(&s)))
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 120,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };
    Ok(tera::Value::String(truncate_chars(&s, length, &omission)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub nav: Vec<NavItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

/// One card on a home or listing page
#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub title: String,
    pub href: String,
    pub excerpt: String,
    pub image: Option<String>,
    /// Raw date; absent for undated entries
    pub date: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub reading_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeSection {
    pub label: String,
    pub href: String,
    pub cards: Vec<CardData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub title: String,
    pub date: Option<String>,
    pub excerpt: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub html: String,
    pub headings: Vec<Heading>,
    pub collection_label: String,
    pub collection_href: String,
    pub pr_notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryLink {
    pub name: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagerData {
    pub current: usize,
    pub total_pages: usize,
    pub total: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub label: String,
    /// Search form target
    pub action: String,
    pub q: String,
    /// Category kept by the search form; absent for the sentinel
    pub cat_param: Option<String>,
    pub categories: Vec<CategoryLink>,
    pub cards: Vec<CardData>,
    pub pager: PagerData,
    /// The dataset could not be read
    pub error: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CtaData {
    pub label: String,
    pub href: String,
    pub start: f64,
    /// Empty when the CTA never ends
    pub end: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewData {
    pub title: String,
    pub excerpt: Option<String>,
    pub video_src: String,
    pub poster: Option<String>,
    pub start_at: u64,
    pub ctas: Vec<CtaData>,
    pub back_href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlossaryEntryData {
    pub term: String,
    pub reading: Option<String>,
    pub anchor: String,
    pub desc: String,
    pub category: Option<String>,
    pub synonyms: Vec<String>,
    pub badge: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlossaryGroupData {
    pub key: String,
    pub items: Vec<GlossaryEntryData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlossaryData {
    pub label: String,
    pub action: String,
    pub q: String,
    pub cat_param: Option<String>,
    pub categories: Vec<CategoryLink>,
    pub groups: Vec<GlossaryGroupData>,
    pub total: usize,
    pub error: bool,
}
