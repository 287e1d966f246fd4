//! Product and variant types.

use serde::{Deserialize, Serialize};
use vitrine_core::{Money, ProductId, VariantId};

/// What happens when a tracked variant sells out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InventoryPolicy {
    /// Stop selling at zero inventory.
    #[default]
    Deny,
    /// Keep selling when out of stock.
    Continue,
}

impl InventoryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryPolicy::Deny => "deny",
            InventoryPolicy::Continue => "continue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deny" => Some(InventoryPolicy::Deny),
            "continue" => Some(InventoryPolicy::Continue),
            _ => None,
        }
    }
}

/// Inventory information for a variant, as far as the platform exposes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Inventory {
    /// Units in stock. `None` when the platform does not track or does not
    /// expose inventory for this variant.
    pub quantity: Option<i64>,
    /// Sell-out behavior.
    pub policy: InventoryPolicy,
}

impl Inventory {
    /// Tracked inventory with a known quantity.
    pub fn tracked(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            policy: InventoryPolicy::Deny,
        }
    }

    /// Untracked inventory (no quantity ceiling).
    pub fn untracked() -> Self {
        Self {
            quantity: None,
            policy: InventoryPolicy::Continue,
        }
    }

    /// The ceiling quantity controls clamp to, or `None` when unbounded
    /// (untracked inventory, or continue-selling when out of stock).
    pub fn max_orderable(&self) -> Option<i64> {
        match (self.quantity, self.policy) {
            (Some(q), InventoryPolicy::Deny) => Some(q.max(0)),
            _ => None,
        }
    }
}

/// One concrete purchasable variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Stock keeping unit.
    pub sku: String,
    /// One value per option position, in the product's option order.
    pub options: Vec<String>,
    /// Whether this variant can currently be purchased.
    pub available: bool,
    /// Price in minor currency units.
    pub price: Money,
    /// Original price when the variant is on sale.
    pub compare_at_price: Option<Money>,
    /// Image shown when this variant is selected.
    pub featured_image: Option<VariantImage>,
    /// Inventory information.
    pub inventory: Inventory,
}

impl Variant {
    /// Check if this variant is on sale (compare-at price above price).
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .map(|cap| cap.minor_units > self.price.minor_units)
            .unwrap_or(false)
    }

    /// Display name built from option values (e.g. "Red / M").
    pub fn display_name(&self) -> String {
        if self.options.is_empty() {
            "Default".to_string()
        } else {
            self.options.join(" / ")
        }
    }

    /// Whether the variant's option tuple matches `values` exactly.
    pub fn matches(&self, values: &[String]) -> bool {
        self.options == values
    }
}

/// Image attached to a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantImage {
    /// Platform media identifier.
    pub id: String,
    /// Image URL.
    pub src: String,
}

/// A product with its full variant list.
///
/// Immutable for the lifetime of a surface: fetched once on activation and
/// replaced wholesale if the surface re-fetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle (the key used to fetch this product).
    pub handle: String,
    /// Ordered option names (e.g. ["Color", "Size"]), shared by every variant.
    pub options: Vec<String>,
    /// All purchasable combinations.
    pub variants: Vec<Variant>,
    /// Product image URLs.
    pub images: Vec<String>,
}

impl Product {
    /// Number of option positions.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Look up a variant by ID.
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Check the catalog invariant: every variant's option tuple has the
    /// same arity as the product's option list.
    pub fn has_consistent_options(&self) -> bool {
        self.variants
            .iter()
            .all(|v| v.options.len() == self.options.len())
    }
}
