use thiserror::Error;

use crate::domain::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("you can add at most {max_addable} more unit(s) of product {product_id}")]
    LimitExceeded {
        product_id: ProductId,
        max_addable: u32,
    },
    #[error("the cart is empty")]
    EmptyCart,
    #[error("{0}")]
    ServerRejected(String),
    #[error("transport failure: {0}")]
    TransportFailure(String),
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("an order submission is already in progress")]
    SubmissionInFlight,
}

impl ShopError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }

    /// Blocking errors are raised as alerts; the rest are shown inline next to the cart.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::ServerRejected(_) | Self::TransportFailure(_))
    }
}
