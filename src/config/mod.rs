//! Configuration module

mod site;

pub use site::CollectionConfig;
pub use site::DatasetConfig;
pub use site::DatasetKind;
pub use site::HighlightConfig;
pub use site::SiteConfig;
