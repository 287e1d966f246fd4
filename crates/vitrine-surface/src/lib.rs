//! Surface adapters.
//!
//! One adapter per cart-affecting UI area: the main product form, a cart or
//! quick-order row, a compare/wishlist row, the badge count, and plain
//! fragment regions refreshed from section re-renders. Adapters glue
//! resolver output and sync results to surface-owned display state; every
//! network failure is absorbed here into inline, auto-dismissing state and
//! never crosses to another surface.

pub mod badge;
pub mod line_row;
pub mod list;
pub mod media;
pub mod product_form;
pub mod region;
pub mod state;
pub mod view;

pub use badge::CartBadge;
pub use line_row::LineRowSurface;
pub use list::{ListKind, ListRow, ProductListSurface};
pub use media::{FallbackAction, ImageFallbackPolicy};
pub use product_form::ProductFormSurface;
pub use region::FragmentRegion;
pub use state::LineState;
pub use view::VariantView;

/// Prelude for consumers wiring a whole page.
pub mod prelude {
    pub use crate::badge::CartBadge;
    pub use crate::line_row::LineRowSurface;
    pub use crate::list::{ListKind, ProductListSurface};
    pub use crate::media::{FallbackAction, ImageFallbackPolicy};
    pub use crate::product_form::ProductFormSurface;
    pub use crate::region::FragmentRegion;
    pub use crate::state::LineState;
    pub use crate::view::VariantView;
}
