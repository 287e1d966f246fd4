//! Serde mirrors of the platform payloads.
//!
//! These structs track the endpoint JSON exactly and are converted into
//! domain types immediately after parsing; nothing outside this module
//! touches the wire shapes. Numeric platform IDs become string-backed typed
//! IDs during conversion.

use crate::state::{CartLine, CartState, LineProperty};
use serde::Deserialize;
use std::collections::BTreeMap;
use vitrine_catalog::{Inventory, InventoryPolicy, Product, Variant, VariantImage};
use vitrine_core::{Currency, Money, ProductId, VariantId};

/// `GET /cart.json` and `POST /cart/change.js` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CartJson {
    pub item_count: i64,
    pub total_price: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItemJson>,
}

/// One cart line on the wire. `id` is the variant ID.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemJson {
    pub id: i64,
    pub quantity: i64,
    pub title: String,
    pub price: i64,
    pub line_price: i64,
    #[serde(default)]
    pub properties: Option<BTreeMap<String, serde_json::Value>>,
}

impl CartJson {
    /// Convert into the authoritative domain state. Line indices are the
    /// 1-based positions the change endpoint expects.
    pub fn into_state(self, fallback_currency: Currency) -> CartState {
        let currency = self
            .currency
            .as_deref()
            .and_then(Currency::from_code)
            .unwrap_or(fallback_currency);
        let lines = self
            .items
            .into_iter()
            .enumerate()
            .map(|(position, item)| CartLine {
                line_index: position as u32 + 1,
                variant_id: VariantId::new(item.id.to_string()),
                quantity: item.quantity,
                title: item.title,
                unit_price: Money::new(item.price, currency),
                line_price: Money::new(item.line_price, currency),
                properties: properties_from_wire(item.properties),
            })
            .collect();
        CartState {
            item_count: self.item_count,
            total_price: Money::new(self.total_price, currency),
            lines,
        }
    }
}

fn properties_from_wire(
    properties: Option<BTreeMap<String, serde_json::Value>>,
) -> Vec<LineProperty> {
    properties
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| LineProperty {
            name,
            value: match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
        })
        .collect()
}

/// Error body from a rejected mutation, e.g.
/// `{"status": 422, "message": "Cart Error", "description": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationErrorJson {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MutationErrorJson {
    /// The most specific human-readable text the platform offered.
    pub fn into_message(self) -> Option<String> {
        self.description.or(self.message)
    }
}

/// `GET /products/<handle>.js` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductJson {
    pub id: i64,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub variants: Vec<VariantJson>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One variant on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantJson {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    pub available: bool,
    pub price: i64,
    #[serde(default)]
    pub compare_at_price: Option<i64>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImageJson>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub inventory_policy: Option<String>,
}

/// Variant image on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedImageJson {
    pub id: i64,
    pub src: String,
}

impl ProductJson {
    /// Convert into the catalog domain type.
    pub fn into_product(self, currency: Currency) -> Product {
        Product {
            id: ProductId::new(self.id.to_string()),
            title: self.title,
            handle: self.handle,
            options: self.options,
            variants: self
                .variants
                .into_iter()
                .map(|v| v.into_variant(currency))
                .collect(),
            images: self.images,
        }
    }
}

impl VariantJson {
    fn into_variant(self, currency: Currency) -> Variant {
        Variant {
            id: VariantId::new(self.id.to_string()),
            sku: self.sku.unwrap_or_default(),
            options: self.options,
            available: self.available,
            price: Money::new(self.price, currency),
            compare_at_price: self.compare_at_price.map(|p| Money::new(p, currency)),
            featured_image: self.featured_image.map(|img| VariantImage {
                id: img.id.to_string(),
                src: img.src,
            }),
            inventory: Inventory {
                quantity: self.inventory_quantity,
                policy: self
                    .inventory_policy
                    .as_deref()
                    .and_then(InventoryPolicy::from_str)
                    .unwrap_or_default(),
            },
        }
    }
}
