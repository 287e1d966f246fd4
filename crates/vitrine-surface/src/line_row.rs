//! Cart row surface.
//!
//! One instance per row with a quantity control: cart page lines, drawer
//! lines, quick-order rows. All mutations go through `CartSync` under this
//! surface's key, so rapid clicks coalesce instead of racing.

use crate::state::LineState;
use std::sync::Arc;
use std::time::Instant;
use vitrine_cart::{CartLine, CartSync, LineKey};
use vitrine_core::{SurfaceId, ThemeConfig};

/// A single cart line with its quantity control.
pub struct LineRowSurface {
    key: LineKey,
    quantity: i64,
    /// Ceiling from inventory tracking, when the variant has one.
    max_orderable: Option<i64>,
    state: LineState,
    config: Arc<ThemeConfig>,
    sync: Arc<CartSync>,
}

impl LineRowSurface {
    /// Attach a row for an existing cart line.
    ///
    /// `max_orderable` comes from the variant's inventory when the catalog
    /// payload is at hand (`Inventory::max_orderable`); rows rendered purely
    /// from cart payloads pass `None`.
    pub fn attach(
        surface: SurfaceId,
        line: &CartLine,
        max_orderable: Option<i64>,
        config: Arc<ThemeConfig>,
        sync: Arc<CartSync>,
    ) -> Self {
        Self {
            key: LineKey::new(surface, line.line_index),
            quantity: line.quantity,
            max_orderable,
            state: LineState::default(),
            config,
            sync,
        }
    }

    pub fn key(&self) -> &LineKey {
        &self.key
    }

    /// Last settled quantity. Zero after a successful removal.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn state(&self) -> &LineState {
        &self.state
    }

    /// True once the row's line has been removed from the cart.
    pub fn is_removed(&self) -> bool {
        self.quantity == 0
    }

    /// Clamp a desired quantity to `[1, inventory ceiling]`.
    pub fn clamp(&self, desired: i64) -> i64 {
        let desired = desired.max(1);
        match self.max_orderable {
            Some(ceiling) => desired.min(ceiling.max(1)),
            None => desired,
        }
    }

    /// Set an absolute quantity (clamped) and despatch the change.
    pub async fn set_quantity(&mut self, desired: i64) -> &LineState {
        let clamped = self.clamp(desired);
        if clamped != desired {
            tracing::debug!(
                line = self.key.line,
                desired,
                clamped,
                "quantity clamped to inventory ceiling"
            );
        }
        self.despatch(clamped).await
    }

    /// Step the quantity by a delta (clamped) and despatch the change.
    pub async fn bump(&mut self, delta: i64) -> &LineState {
        let desired = self.clamp(self.quantity.saturating_add(delta));
        self.despatch(desired).await
    }

    /// Remove the line (quantity 0, not clamped).
    pub async fn remove(&mut self) -> &LineState {
        self.despatch(0).await
    }

    async fn despatch(&mut self, quantity: i64) -> &LineState {
        self.state.interact();
        self.state.begin();
        match self.sync.change_line(self.key.clone(), quantity).await {
            Ok(cart) => {
                // Authoritative refresh: the line may have moved or gone.
                self.quantity = cart
                    .line(self.key.line)
                    .map(|l| l.quantity)
                    .unwrap_or(0);
                self.state.settle_ok();
            }
            Err(err) => {
                let message = if err.is_mutation() {
                    err.to_string()
                } else {
                    self.config.strings.cart_error.clone()
                };
                self.state.settle_err(message, Instant::now());
            }
        }
        &self.state
    }

    /// Advance the error-dismiss clock.
    pub fn tick(&mut self, now: Instant) {
        self.state.tick(now, self.config.error_dwell());
    }
}
