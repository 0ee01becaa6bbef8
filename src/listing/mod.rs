//! Listing pages over pre-built JSON datasets and collection indexes

mod cta;
mod dataset;
mod filter;
pub mod glossary;
mod item;
mod query;

pub use cta::{active_ctas, parse_start_offset, video_src, AffiliateCta};
pub use dataset::{find_by_slug, latest, load_dataset, Dataset, Slugged};
pub use filter::{
    apply, categories, filter_by_category, is_all_category, paginate, search, sort_by_date_desc,
    total_pages, Page, CATEGORY_ALL, CATEGORY_ALL_JA,
};
pub use glossary::GlossaryItem;
pub use item::{Listable, ListingItem};
pub use query::{parse_page, ListingParams, ListingQuery, ListingState};
