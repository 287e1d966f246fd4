//! Authoritative cart state.
//!
//! The cart is owned by the platform; this state is recomputed wholesale
//! from the latest payload after every mutation, never patched
//! incrementally. Line indices are 1-based positions and do not survive
//! removals of other lines, so nothing here caches an index across
//! mutations.

use serde::{Deserialize, Serialize};
use vitrine_core::{Money, VariantId};

/// Snapshot of the server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Total item count (sum of line quantities).
    pub item_count: i64,
    /// Cart total.
    pub total_price: Money,
    /// Lines in cart order.
    pub lines: Vec<CartLine>,
}

impl CartState {
    /// Look up a line by its 1-based index.
    pub fn line(&self, line_index: u32) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.line_index == line_index)
    }

    /// Look up the line holding a variant.
    pub fn line_for_variant(&self, variant_id: &VariantId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.variant_id == variant_id)
    }

    /// True when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// 1-based position, as used by the change endpoint.
    pub line_index: u32,
    /// Variant in this line.
    pub variant_id: VariantId,
    /// Units of the variant.
    pub quantity: i64,
    /// Display title.
    pub title: String,
    /// Price per unit.
    pub unit_price: Money,
    /// Price for the whole line.
    pub line_price: Money,
    /// Custom properties attached when the line was added.
    pub properties: Vec<LineProperty>,
}

/// A custom property on a cart line (e.g. engraving text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineProperty {
    pub name: String,
    pub value: String,
}

impl LineProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
