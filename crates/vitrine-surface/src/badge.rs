//! Cart badge count.

use tokio::sync::watch;
use vitrine_cart::{CartState, CartSync};

/// The shared item-count badge.
///
/// The count is recomputed wholesale from every authoritative cart snapshot
/// the sync engine publishes; all writers derive it from the same payload,
/// so last-write-wins needs no further coordination.
pub struct CartBadge {
    updates: watch::Receiver<Option<CartState>>,
}

impl CartBadge {
    /// Attach a badge to the sync engine's snapshot stream.
    pub fn attach(sync: &CartSync) -> Self {
        Self {
            updates: sync.cart_updates(),
        }
    }

    /// The current item count; zero until a snapshot has been observed.
    pub fn count(&self) -> i64 {
        self.updates
            .borrow()
            .as_ref()
            .map(|cart| cart.item_count)
            .unwrap_or(0)
    }

    /// Wait for the next snapshot. Returns false when the engine is gone.
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }
}
