pub mod classify;
pub mod consolidate;
pub mod engine;
pub mod error;
pub mod extract;
pub mod loader;
pub mod regions;
pub mod report;
pub mod score;
pub mod taxonomy;

pub use engine::CatalogEngine;
pub use error::{CatalogError, Result};
pub use taxonomy::Taxonomy;
