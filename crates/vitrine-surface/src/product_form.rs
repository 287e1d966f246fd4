//! Main product form surface.

use crate::state::LineState;
use crate::view::VariantView;
use std::sync::Arc;
use std::time::Instant;
use vitrine_cart::{CartSync, LineProperty};
use vitrine_catalog::{resolver, OptionSelection, Product};
use vitrine_core::{SurfaceId, ThemeConfig};

/// The add-to-cart form on a product page.
///
/// Owns the product payload (immutable for the surface's lifetime), the
/// option selection, and the submit-control state. Every failure ends up as
/// inline display state, never a propagated error.
pub struct ProductFormSurface {
    id: SurfaceId,
    product: Product,
    selection: OptionSelection,
    state: LineState,
    config: Arc<ThemeConfig>,
    sync: Arc<CartSync>,
}

impl ProductFormSurface {
    /// Attach a form to a product payload.
    pub fn attach(product: Product, config: Arc<ThemeConfig>, sync: Arc<CartSync>) -> Self {
        let selection = OptionSelection::new(product.option_count());
        Self {
            id: SurfaceId::generate(),
            product,
            selection,
            state: LineState::default(),
            config,
            sync,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn selection(&self) -> &OptionSelection {
        &self.selection
    }

    pub fn state(&self) -> &LineState {
        &self.state
    }

    /// Current display state for the surface's region.
    pub fn view(&self) -> VariantView {
        VariantView::project(&self.product, &self.selection, &self.config)
    }

    /// Record an option pick and return the refreshed display state.
    /// Out-of-range positions are ignored (stale markup can reference them).
    pub fn select_option(&mut self, position: usize, value: &str) -> VariantView {
        self.state.interact();
        self.selection.select(position, value);
        self.view()
    }

    /// Clear an option slot and return the refreshed display state.
    pub fn clear_option(&mut self, position: usize) -> VariantView {
        self.state.interact();
        self.selection.clear(position);
        self.view()
    }

    /// Submit the form: resolve the selection and add the variant.
    ///
    /// While a previous submit is pending the call is a no-op (double-submit
    /// guard). An unresolvable or sold-out selection errors inline without
    /// touching the network.
    pub async fn add_to_cart(&mut self, quantity: i64) -> &LineState {
        self.add_to_cart_with(quantity, &[]).await
    }

    /// Submit with custom line properties (e.g. engraving text).
    pub async fn add_to_cart_with(
        &mut self,
        quantity: i64,
        properties: &[LineProperty],
    ) -> &LineState {
        let variant = match resolver::resolve(&self.product.variants, &self.selection) {
            Some(v) => v,
            None => {
                self.state
                    .settle_err(self.config.strings.unavailable.clone(), Instant::now());
                return &self.state;
            }
        };
        if !variant.available {
            self.state
                .settle_err(self.config.strings.sold_out.clone(), Instant::now());
            return &self.state;
        }
        let variant_id = variant.id.clone();

        if !self.state.begin() {
            return &self.state;
        }
        match self
            .sync
            .add_line(&variant_id, quantity.max(1), properties)
            .await
        {
            Ok(_) => self.state.settle_ok(),
            Err(err) => {
                tracing::debug!(surface = %self.id, error = %err, "add to cart failed");
                self.state.settle_err(err.to_string(), Instant::now());
            }
        }
        &self.state
    }

    /// Advance the error-dismiss clock.
    pub fn tick(&mut self, now: Instant) {
        self.state.tick(now, self.config.error_dwell());
    }
}
