use async_trait::async_trait;
use overlay_protocol::Catalog;

use crate::ports::outbound::{CatalogError, CatalogPort};

/// Catalog source that returns a fixed catalog, or fails when empty.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: Option<Catalog>,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    pub fn failing() -> Self {
        Self { catalog: None }
    }
}

#[async_trait]
impl CatalogPort for StaticCatalog {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        self.catalog
            .clone()
            .ok_or_else(|| CatalogError::Http("connection refused".to_string()))
    }
}
