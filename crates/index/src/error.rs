use thiserror::Error;

/// Errors raised while producing metadata or loading catalogs.
///
/// Registry operations themselves never fail; a miss is `None`.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Metadata extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid type descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Failed to read catalog {path}: {reason}")]
    CatalogRead { path: String, reason: String },

    #[error("Failed to parse catalog {path}: {reason}")]
    CatalogParse { path: String, reason: String },
}
