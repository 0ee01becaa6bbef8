//! Content module - collections of MDX documents and their processing

mod collection;
mod compiler;
mod frontmatter;
pub mod index;
pub mod slug;
pub mod walker;

pub use collection::{combined_index, find_document, Collection, ContentDocument, RenderedDocument};
pub use compiler::{
    heading_slug, CompiledDocument, ComponentNode, Heading, MdxCompiler, Node, PropValue, Props,
};
pub use frontmatter::FrontMatter;
pub use index::{build_index, find_meta, PostMeta};
