//! JSON over HTTP implementation of [`ShopBackend`].

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Product,
    error::ShopError,
    protocol::{catalog_from_entries, CatalogEntry, OrderRequest, SaveOrderResponse},
};
use tracing::{debug, info};

use crate::{config::ClientSettings, ShopBackend};

pub struct HttpShopBackend {
    http: Client,
    products_url: String,
    order_url: String,
}

impl HttpShopBackend {
    pub fn new(settings: &ClientSettings) -> Result<Self, ShopError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ShopError::transport(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            products_url: settings.products_url(),
            order_url: settings.order_url(),
        })
    }
}

#[async_trait]
impl ShopBackend for HttpShopBackend {
    async fn fetch_products(&self) -> Result<Vec<Product>, ShopError> {
        let res = self
            .http
            .get(&self.products_url)
            .send()
            .await
            .map_err(|e| ShopError::transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ShopError::transport(e.to_string()))?;
        let entries: Vec<CatalogEntry> = res
            .json()
            .await
            .map_err(|e| ShopError::transport(format!("malformed product list: {e}")))?;
        let products = catalog_from_entries(entries)?;
        info!(count = products.len(), "fetched product catalog");
        Ok(products)
    }

    async fn save_order(&self, request: &OrderRequest) -> Result<SaveOrderResponse, ShopError> {
        let res = self
            .http
            .post(&self.order_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ShopError::transport(e.to_string()))?;

        // Rejections may come back with a 4xx/5xx status and a regular body.
        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|e| ShopError::transport(e.to_string()))?;
        debug!(%status, bytes = body.len(), "order endpoint replied");
        serde_json::from_slice(&body).map_err(|e| {
            ShopError::transport(format!("unexpected order response (HTTP {status}): {e}"))
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
