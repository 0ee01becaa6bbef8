//! Builtin components

use std::sync::Arc;

use super::{Component, RenderContext};
use crate::content::{ComponentNode, PropValue};
use crate::helpers::{escape_html, kebab_case};

/// Builtin renderer for a component name; unknown names get a [`Wrapper`]
pub(super) fn lookup(name: &str) -> Arc<dyn Component> {
    match name {
        "InlineToc" => Arc::new(InlineToc),
        "Image" => Arc::new(Image),
        "Link" => Arc::new(Link),
        other => Arc::new(Wrapper::new(other)),
    }
}

/// Table of contents built from the document's h2 and h3 headings
pub struct InlineToc;

impl Component for InlineToc {
    fn render(&self, node: &ComponentNode, _children: &str, ctx: &RenderContext<'_>) -> String {
        let entries: Vec<_> = ctx
            .headings
            .iter()
            .filter(|h| h.level == 2 || h.level == 3)
            .collect();
        if entries.is_empty() {
            return String::new();
        }

        let title = node.prop("title").unwrap_or("目次");
        let mut html = format!(
            r#"<nav class="inline-toc" aria-label="{0}"><p class="inline-toc-title">{0}</p><ol>"#,
            escape_html(title)
        );

        let mut sub_open = false;
        let mut item_open = false;
        for heading in entries {
            let link = format!(
                r##"<a href="#{}">{}</a>"##,
                escape_html(&heading.id),
                escape_html(&heading.text)
            );
            if heading.level == 3 && item_open {
                if !sub_open {
                    html.push_str("<ol>");
                    sub_open = true;
                }
                html.push_str(&format!("<li>{}</li>", link));
                continue;
            }
            if sub_open {
                html.push_str("</ol>");
                sub_open = false;
            }
            if item_open {
                html.push_str("</li>");
            }
            html.push_str(&format!("<li>{}", link));
            item_open = true;
        }
        if sub_open {
            html.push_str("</ol>");
        }
        if item_open {
            html.push_str("</li>");
        }
        html.push_str("</ol></nav>");
        html
    }
}

/// `<Image src alt width height />`
pub struct Image;

impl Component for Image {
    fn render(&self, node: &ComponentNode, _children: &str, _ctx: &RenderContext<'_>) -> String {
        let mut html = format!(
            r#"<img src="{}" alt="{}""#,
            escape_html(node.prop("src").unwrap_or_default()),
            escape_html(node.prop("alt").unwrap_or_default())
        );
        for attr in ["width", "height"] {
            if let Some(v) = node.prop(attr) {
                html.push_str(&format!(r#" {}="{}""#, attr, escape_html(v)));
            }
        }
        html.push_str(r#" loading="lazy" decoding="async">"#);
        html
    }
}

/// `<Link href>text</Link>`; external targets open in a new tab
pub struct Link;

impl Component for Link {
    fn render(&self, node: &ComponentNode, children: &str, _ctx: &RenderContext<'_>) -> String {
        let href = node.prop("href").unwrap_or("#");
        let external = href.starts_with("http://") || href.starts_with("https://");
        let text = strip_paragraph(children);
        if external {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                escape_html(href),
                text
            )
        } else {
            format!(r#"<a href="{}">{}</a>"#, escape_html(href), text)
        }
    }
}

/// Generic container for presentational components: a `div` carrying the
/// component name and its props as data attributes.
pub struct Wrapper {
    name: String,
    class: String,
}

impl Wrapper {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            class: format!("mdx-{}", kebab_case(name)),
        }
    }
}

impl Component for Wrapper {
    fn render(&self, node: &ComponentNode, children: &str, _ctx: &RenderContext<'_>) -> String {
        let mut html = format!(
            r#"<div class="{}" data-component="{}""#,
            self.class,
            escape_html(&self.name)
        );
        for (key, value) in &node.props {
            let value = match value {
                PropValue::Str(s) | PropValue::Expr(s) => s.as_str(),
                PropValue::Flag => "",
            };
            html.push_str(&format!(
                r#" data-{}="{}""#,
                kebab_case(key),
                escape_html(value)
            ));
        }
        html.push('>');
        html.push_str(children);
        html.push_str("</div>");
        html
    }
}

/// Unwrap a lone `<p>` so inline children stay inline
fn strip_paragraph(html: &str) -> &str {
    let trimmed = html.trim();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner,
        _ => trimmed,
    }
}
