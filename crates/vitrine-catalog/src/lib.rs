//! Product catalog model and variant resolution.
//!
//! A product carries a flat list of variants, each distinguished by an
//! ordered tuple of option values (e.g. Color=Red, Size=M). The resolver in
//! this crate is the single shared implementation of "which variant does this
//! selection pin down, and which option values are still selectable" - logic
//! every cart-affecting surface consumes.

pub mod product;
pub mod resolver;
pub mod selection;

pub use product::{Inventory, InventoryPolicy, Product, Variant, VariantImage};
pub use selection::OptionSelection;
