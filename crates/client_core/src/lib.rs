use async_trait::async_trait;
use shared::{
    domain::{OrderResult, Product},
    error::ShopError,
    protocol::{OrderRequest, SaveOrderResponse},
};

pub mod cart;
pub mod config;
mod session;
pub mod totals;
pub mod transport;

pub use cart::Cart;
pub use config::{load_settings, load_settings_from, ClientSettings};
pub use session::{ShopSession, SubmissionState};
pub use totals::{compute_order_totals, LineTotal, OrderTotals};
pub use transport::HttpShopBackend;

/// The two calls the storefront backend serves.
#[async_trait]
pub trait ShopBackend: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, ShopError>;
    async fn save_order(&self, request: &OrderRequest) -> Result<SaveOrderResponse, ShopError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CatalogLoaded { products: usize },
    CartChanged,
    OrderSubmitting,
    OrderCompleted(OrderResult),
}
