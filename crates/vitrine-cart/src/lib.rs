//! Cart synchronization against the storefront AJAX endpoints.
//!
//! This crate provides:
//! - `StorefrontClient` - typed HTTP despatch to the platform's cart and
//!   catalog endpoints (`/cart/add.js`, `/cart/change.js`, `/cart.json`,
//!   `/products/<handle>.js`, `/?sections=<ids>`)
//! - `CartSync` - the mutation engine: per-line single-flight with
//!   latest-quantity coalescing, authoritative-state publication, and
//!   section re-render fan-out to every registered sink
//! - `CartState` / `CartLine` - the authoritative cart, recomputed wholesale
//!   from each payload
//!
//! The platform endpoints are consumed as a black box: no server behavior is
//! reimplemented here, and failed mutations are surfaced, never retried.

pub mod client;
pub mod error;
pub mod sections;
pub mod state;
pub mod sync;
pub mod wire;

pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use sections::{RenderedSections, SectionSink};
pub use state::{CartLine, CartState, LineProperty};
pub use sync::{CartSync, LineKey};
