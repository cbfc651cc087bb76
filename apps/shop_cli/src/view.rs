//! Plain-text rendering of catalog, cart and order outcome.

use client_core::{Cart, OrderTotals};
use shared::{
    domain::{format_eur, OrderResult},
    error::ShopError,
};

pub fn render_products(cart: &Cart) -> String {
    if cart.products().is_empty() {
        return "No products available".to_string();
    }
    let mut out = String::new();
    for product in cart.products() {
        let marker = if cart.can_add(product.id) { " " } else { "x" };
        out.push_str(&format!(
            "[{marker}] #{} {} – {} – Available: {}\n",
            product.id,
            product.name,
            format_eur(product.unit_price),
            product.available_quantity
        ));
    }
    out
}

pub fn render_cart(totals: &OrderTotals) -> String {
    if totals.lines.is_empty() {
        return "The cart is empty".to_string();
    }
    let mut out = String::new();
    for line in &totals.lines {
        out.push_str(&format!(
            "{} × {} – {}\n",
            line.name,
            line.quantity,
            format_eur(line.subtotal)
        ));
    }
    out.push_str("---\n");
    out.push_str(&format!("Subtotal: {}\n", format_eur(totals.subtotal)));
    if totals.has_discount() {
        out.push_str(&format!("Discount (10%): -{}\n", format_eur(totals.discount)));
    }
    out.push_str(&format!("Order total: {}\n", format_eur(totals.total)));
    out
}

pub fn render_error(err: &ShopError) -> String {
    if err.is_blocking() {
        format!("! {err}")
    } else {
        format!("  {err}")
    }
}

pub fn render_result(result: &OrderResult) -> String {
    let tag = if result.success { "OK" } else { "FAILED" };
    format!("[{tag}] {}", result.message)
}
