//! Read-only access to the backend's ability catalog.

use async_trait::async_trait;
use overlay_protocol::Catalog;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(String),

    #[error("catalog request returned status {0}")]
    Status(u16),

    #[error("catalog body is not valid JSON: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CatalogPort: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError>;
}
