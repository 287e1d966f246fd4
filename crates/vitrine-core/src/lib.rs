//! Core primitives shared by every Vitrine crate.
//!
//! This crate provides:
//! - `ThemeConfig` - explicit theme configuration (replaces ambient globals)
//! - Typed IDs - `ProductId`, `VariantId`, `SectionId`, `SurfaceId`
//! - `Money` / `MoneyFormat` - minor-unit prices and display templates

pub mod config;
pub mod ids;
pub mod money;

pub use config::{CartStrings, ThemeConfig};
pub use ids::{ProductId, SectionId, SurfaceId, VariantId};
pub use money::{Currency, Money, MoneyFormat};
