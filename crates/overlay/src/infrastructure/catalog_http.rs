//! HTTP catalog client
//!
//! Implements the CatalogPort trait against the backend's `/api/catalog`.

use std::time::Duration;

use async_trait::async_trait;
use overlay_protocol::Catalog;
use reqwest::Client;
use url::Url;

use crate::ports::outbound::{CatalogError, CatalogPort};

#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    url: Url,
}

impl HttpCatalog {
    pub fn new(url: Url) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, url }
    }
}

#[async_trait]
impl CatalogPort for HttpCatalog {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}
