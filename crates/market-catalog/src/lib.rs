//! Template catalog: records, filtering, facet lists, and view state
//!
//! ```no_run
//! use market_catalog::{Catalog, FilterQuery, TemplateType};
//!
//! let catalog = Catalog::builtin()?;
//! let query = FilterQuery::new().with_kind(TemplateType::DiagramFramework);
//! for record in market_catalog::filter(&catalog, &query) {
//!     println!("{} {}", record.id, record.title);
//! }
//! # Ok::<(), market_catalog::CatalogError>(())
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod facets;
pub mod filter;
pub mod record;
pub mod view;

pub use catalog::Catalog;
pub use facets::{ALL_LABEL, Facet, Facets};
pub use filter::{FilterCache, FilterQuery, filter};
pub use record::{TemplateRecord, TemplateType, UnknownTemplateType, format_number};
pub use view::{
    Controller, DetailState, DetailTab, Effect, Intent, PREVIEW_SLOTS, PresentationMode, Screen,
    ViewState, update,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported catalog format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("duplicate template id '{0}'")]
    DuplicateId(String),

    #[error("template '{title}' has an empty id")]
    EmptyId { title: String },

    #[error("template '{id}' uses the reserved category name '全部'")]
    ReservedCategory { id: String },

    #[error("template '{id}' has invalid price {price}")]
    InvalidPrice { id: String, price: f64 },

    #[error("template '{id}' has invalid rating {rating}")]
    InvalidRating { id: String, rating: f64 },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
