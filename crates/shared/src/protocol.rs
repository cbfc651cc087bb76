use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Product, ProductId, MAX_UNIT_PRICE},
    error::ShopError,
};

/// One row of `GET /products`, field names as the backend sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "prezzo")]
    pub unit_price: Decimal,
    #[serde(rename = "quantita_disponibile")]
    pub available_quantity: u32,
}

impl TryFrom<CatalogEntry> for Product {
    type Error = ShopError;

    fn try_from(entry: CatalogEntry) -> Result<Self, Self::Error> {
        if entry.unit_price < Decimal::ZERO {
            return Err(ShopError::transport(format!(
                "product {} has a negative price {}",
                entry.id, entry.unit_price
            )));
        }
        if entry.unit_price > MAX_UNIT_PRICE {
            return Err(ShopError::transport(format!(
                "product {} has an implausible price {} (max {MAX_UNIT_PRICE})",
                entry.id, entry.unit_price
            )));
        }
        Ok(Product::new(
            entry.id,
            entry.name,
            entry.unit_price,
            entry.available_quantity,
        ))
    }
}

/// Validates a decoded catalog payload and converts it to domain products.
pub fn catalog_from_entries(entries: Vec<CatalogEntry>) -> Result<Vec<Product>, ShopError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut products = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(ShopError::transport(format!(
                "duplicate product id {} in catalog",
                entry.id
            )));
        }
        products.push(Product::try_from(entry)?);
    }
    Ok(products)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum OrderIdRepr {
    Text(String),
    Number(i64),
}

fn deserialize_order_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let repr = Option::<OrderIdRepr>::deserialize(deserializer)?;
    Ok(repr.map(|repr| match repr {
        OrderIdRepr::Text(text) => text,
        OrderIdRepr::Number(number) => number.to_string(),
    }))
}

/// Body of the order endpoint's reply, for both acceptance and rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOrderResponse {
    pub success: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_order_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
