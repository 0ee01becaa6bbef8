//! Component registry and rendering of compiled documents

mod builtin;

pub use builtin::{Image, InlineToc, Link, Wrapper};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::content::{CompiledDocument, ComponentNode, Heading, Node};

/// Data available to every component while a document renders
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Outline of the whole document
    pub headings: &'a [Heading],
}

/// A renderable component. `children` is the already rendered inner HTML.
pub trait Component: Send + Sync {
    fn render(&self, node: &ComponentNode, children: &str, ctx: &RenderContext<'_>) -> String;
}

impl<F> Component for F
where
    F: Fn(&ComponentNode, &str, &RenderContext<'_>) -> String + Send + Sync,
{
    fn render(&self, node: &ComponentNode, children: &str, ctx: &RenderContext<'_>) -> String {
        self(node, children, ctx)
    }
}

/// The set of components a collection may use, by tag name
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<String, Arc<dyn Component>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the builtin component for each name
    pub fn with_builtins<S: AsRef<str>>(names: &[S]) -> Self {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            registry.entries.insert(name.to_string(), builtin::lookup(name));
        }
        registry
    }

    /// Register or replace a component
    pub fn register(&mut self, name: impl Into<String>, component: impl Component + 'static) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(component));
        self
    }

    pub fn with(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.register(name, component);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.entries.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Render a compiled document to HTML
pub fn render_html(doc: &CompiledDocument, registry: &ComponentRegistry) -> String {
    let ctx = RenderContext {
        headings: &doc.headings,
    };
    let mut out = String::new();
    render_nodes(&doc.nodes, registry, &ctx, &mut out);
    out
}

fn render_nodes(nodes: &[Node], registry: &ComponentRegistry, ctx: &RenderContext<'_>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Html(html) => out.push_str(html),
            Node::Component(component) => {
                let mut children = String::new();
                render_nodes(&component.children, registry, ctx, &mut children);
                match registry.get(&component.name) {
                    Some(renderer) => out.push_str(&renderer.render(component, &children, ctx)),
                    None => {
                        tracing::warn!("No renderer for <{}>, emitting its children", component.name);
                        out.push_str(&children);
                    }
                }
            }
        }
    }
}
