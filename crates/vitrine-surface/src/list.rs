//! Product list surfaces: compare, wishlist, quick-order.
//!
//! A list is reconstructed on attach from persisted product handles: each
//! handle is fetched concurrently and rows that fail to load are skipped,
//! leaving the rest of the list intact. One bad product never blocks its
//! siblings.

use crate::state::LineState;
use crate::view::VariantView;
use std::sync::Arc;
use std::time::Instant;
use vitrine_cart::CartSync;
use vitrine_catalog::{resolver, OptionSelection, Product};
use vitrine_core::{SurfaceId, ThemeConfig};
use vitrine_store::{HandleListStore, Storage, StoreError};

/// Which persisted list a surface renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Compare,
    Wishlist,
    QuickOrder,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Compare => "compare",
            ListKind::Wishlist => "wishlist",
            ListKind::QuickOrder => "quick-order",
        }
    }
}

/// One loaded row with its own selection and submit state.
pub struct ListRow {
    product: Product,
    selection: OptionSelection,
    state: LineState,
}

impl ListRow {
    fn new(product: Product) -> Self {
        let selection = OptionSelection::new(product.option_count());
        Self {
            product,
            selection,
            state: LineState::default(),
        }
    }

    pub fn handle(&self) -> &str {
        &self.product.handle
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn state(&self) -> &LineState {
        &self.state
    }

    /// Display state for this row.
    pub fn view(&self, config: &ThemeConfig) -> VariantView {
        VariantView::project(&self.product, &self.selection, config)
    }

    /// Record an option pick on this row.
    pub fn select_option(&mut self, position: usize, value: &str) {
        self.state.interact();
        self.selection.select(position, value);
    }
}

/// A compare/wishlist/quick-order surface.
pub struct ProductListSurface {
    id: SurfaceId,
    kind: ListKind,
    rows: Vec<ListRow>,
    config: Arc<ThemeConfig>,
    sync: Arc<CartSync>,
}

impl ProductListSurface {
    /// Attach a list surface, reconstructing rows from persisted handles.
    ///
    /// Rows whose product fails to load are skipped and logged; the failure
    /// is isolated to that row.
    pub async fn attach<S: Storage>(
        kind: ListKind,
        store: &HandleListStore<S>,
        config: Arc<ThemeConfig>,
        sync: Arc<CartSync>,
    ) -> Self {
        let handles = store.all();
        let fetches = handles.iter().map(|handle| sync.client().fetch_product(handle));
        let results = futures::future::join_all(fetches).await;

        let mut rows = Vec::with_capacity(handles.len());
        for (handle, result) in handles.iter().zip(results) {
            match result {
                Ok(product) => rows.push(ListRow::new(product)),
                Err(err) => {
                    tracing::warn!(list = kind.as_str(), %handle, error = %err, "skipping unloadable row");
                }
            }
        }

        Self {
            id: SurfaceId::generate(),
            kind,
            rows,
            config,
            sync,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn row(&self, handle: &str) -> Option<&ListRow> {
        self.rows.iter().find(|r| r.handle() == handle)
    }

    pub fn row_mut(&mut self, handle: &str) -> Option<&mut ListRow> {
        self.rows.iter_mut().find(|r| r.handle() == handle)
    }

    /// Add a row's resolved variant to the cart. Unresolvable or sold-out
    /// selections error inline on the row without touching the network.
    pub async fn add_row_to_cart(&mut self, handle: &str, quantity: i64) -> Option<&LineState> {
        let config = self.config.clone();
        let sync = self.sync.clone();
        let row = self.rows.iter_mut().find(|r| r.handle() == handle)?;

        let variant = match resolver::resolve(&row.product.variants, &row.selection) {
            Some(v) if v.available => v.id.clone(),
            Some(_) => {
                row.state
                    .settle_err(config.strings.sold_out.clone(), Instant::now());
                return Some(&row.state);
            }
            None => {
                row.state
                    .settle_err(config.strings.unavailable.clone(), Instant::now());
                return Some(&row.state);
            }
        };

        if !row.state.begin() {
            return Some(&row.state);
        }
        match sync.add_line(&variant, quantity.max(1), &[]).await {
            Ok(_) => row.state.settle_ok(),
            Err(err) => row.state.settle_err(err.to_string(), Instant::now()),
        }
        Some(&row.state)
    }

    /// Drop a row and unpersist its handle.
    pub fn remove_row<S: Storage>(
        &mut self,
        handle: &str,
        store: &mut HandleListStore<S>,
    ) -> Result<bool, StoreError> {
        let removed = store.remove(&handle.to_string())?;
        self.rows.retain(|r| r.handle() != handle);
        Ok(removed)
    }

    /// Advance every row's error-dismiss clock.
    pub fn tick(&mut self, now: Instant) {
        let dwell = self.config.error_dwell();
        for row in &mut self.rows {
            row.state.tick(now, dwell);
        }
    }
}
