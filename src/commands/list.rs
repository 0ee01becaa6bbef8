//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::config::DatasetKind;
use crate::content::combined_index;
use crate::listing::{load_dataset, GlossaryItem, ListingItem};
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let collections = site.collections();

    match content_type {
        "doc" | "docs" | "document" | "documents" => {
            let index = combined_index(&collections);
            println!("Documents ({}):", index.len());
            for meta in index {
                println!(
                    "  {} - {} [{}/{}]",
                    meta.date,
                    meta.title,
                    meta.collection.as_deref().unwrap_or_default(),
                    meta.slug
                );
            }
        }
        "collection" | "collections" => {
            println!("Collections ({}):", collections.len());
            for c in &collections {
                println!(
                    "  {} /{}/ ({} documents) {:?}",
                    c.name,
                    c.route,
                    c.slugs().len(),
                    c.root
                );
            }
        }
        "component" | "components" => {
            for c in &collections {
                let names: Vec<&str> = c.registry.names().collect();
                println!("{} ({}): {}", c.name, names.len(), names.join(", "));
            }
        }
        "dataset" | "datasets" => {
            println!("Datasets ({}):", site.config.datasets.len());
            for dataset in &site.config.datasets {
                let path = site.dataset_path(dataset);
                let (count, error) = match dataset.kind {
                    DatasetKind::Glossary => {
                        let d = load_dataset::<GlossaryItem>(&path);
                        (d.items.len(), d.error)
                    }
                    _ => {
                        let d = load_dataset::<ListingItem>(&path);
                        (d.items.len(), d.error)
                    }
                };
                match error {
                    Some(e) => println!("  {} /{}/ error: {}", dataset.name, dataset.route, e),
                    None => println!("  {} /{}/ ({} items)", dataset.name, dataset.route, count),
                }
            }
        }
        "category" | "categories" => {
            let mut categories: HashMap<String, usize> = HashMap::new();
            for meta in combined_index(&collections) {
                if let Some(cat) = meta.category {
                    *categories.entry(cat).or_insert(0) += 1;
                }
            }
            println!("Categories ({}):", categories.len());
            let mut categories: Vec<_> = categories.into_iter().collect();
            categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: docs, collections, components, datasets, categories",
                content_type
            );
        }
    }

    Ok(())
}
