use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);

/// Decimal places kept when an amount is shown to the user.
pub const CURRENCY_SCALE: u32 = 2;

/// Highest unit price accepted from the catalog. With `u32` quantities every line and cart
/// total stays far inside `Decimal`'s range.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    /// Units still on the shelf from this client's point of view. Mirrors cart changes.
    pub available_quantity: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        available_quantity: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            available_quantity,
        }
    }
}

/// Outcome of the most recent order submission, kept until the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    pub success: bool,
    pub order_id: Option<String>,
    pub message: String,
}

impl OrderResult {
    /// The backend may confirm an order without handing back an id.
    pub fn succeeded(order_id: Option<String>) -> Self {
        let message = match &order_id {
            Some(order_id) => format!("Order saved successfully! ID: {order_id}"),
            None => "Order saved successfully!".to_string(),
        };
        Self {
            success: true,
            order_id,
            message,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            message: message.into(),
        }
    }
}

/// Rounds to cents, midpoint away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_eur(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    format!("€{rounded:.2}")
}
