//! Station catalog error types.

/// Errors from the station catalog.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Bulk snapshot retrieval failed.
    #[error("failed to load stations: {message}")]
    Load { message: String },
}
