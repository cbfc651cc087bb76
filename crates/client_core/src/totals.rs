use rust_decimal::Decimal;
use shared::domain::{round_currency, ProductId};

use crate::cart::Cart;

/// Subtotals strictly above this amount get the discount.
pub const DISCOUNT_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;
/// 10%.
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTotal {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub lines: Vec<LineTotal>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    pub fn has_discount(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    /// Same totals rounded to cents for display or invoicing.
    pub fn rounded(&self) -> Self {
        Self {
            lines: self
                .lines
                .iter()
                .map(|line| LineTotal {
                    subtotal: round_currency(line.subtotal),
                    ..line.clone()
                })
                .collect(),
            subtotal: round_currency(self.subtotal),
            discount: round_currency(self.discount),
            total: round_currency(self.total),
        }
    }
}

pub fn discount_for(subtotal: Decimal) -> Decimal {
    if subtotal > DISCOUNT_THRESHOLD {
        subtotal * DISCOUNT_RATE
    } else {
        Decimal::ZERO
    }
}

/// Prices every cart line against the catalog. Never mutates the cart.
pub fn compute_order_totals(cart: &Cart) -> OrderTotals {
    let lines: Vec<LineTotal> = cart
        .lines()
        .map(|(product_id, quantity)| match cart.product(product_id) {
            Some(product) => LineTotal {
                product_id,
                name: product.name.clone(),
                quantity,
                unit_price: product.unit_price,
                subtotal: product.unit_price * Decimal::from(quantity),
            },
            None => LineTotal {
                product_id,
                name: UNKNOWN_PRODUCT_NAME.to_string(),
                quantity,
                unit_price: Decimal::ZERO,
                subtotal: Decimal::ZERO,
            },
        })
        .collect();

    let subtotal: Decimal = lines.iter().map(|line| line.subtotal).sum();
    let discount = discount_for(subtotal);
    OrderTotals {
        lines,
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

#[cfg(test)]
#[path = "tests/totals_tests.rs"]
mod tests;
