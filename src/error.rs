use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Derivation error for listing {listing_id}: {reason}")]
    Derivation { listing_id: String, reason: String },

    #[error("No listings loaded from any region")]
    EmptyBatch,

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
