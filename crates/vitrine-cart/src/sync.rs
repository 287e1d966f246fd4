//! Cart mutation engine.
//!
//! Serializes quantity changes per cart line and fans section re-renders out
//! to every registered sink. The single-flight invariant: while a request
//! for a `(surface, line)` key is on the wire, a new call for the same key
//! never starts a second network request. A call for the quantity already in
//! flight joins the outstanding settlement; any other quantity is queued,
//! coalescing to the newest requested value, and despatched immediately
//! after the in-flight request settles. Superseded waiters resolve with the
//! latest observed outcome - in-flight requests are never aborted.

use crate::client::StorefrontClient;
use crate::error::StorefrontError;
use crate::sections::SectionSink;
use crate::state::{CartState, LineProperty};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use vitrine_core::{SectionId, SurfaceId, VariantId};

/// Key guarding the one-request-in-flight invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Surface the control lives on.
    pub surface: SurfaceId,
    /// 1-based cart line.
    pub line: u32,
}

impl LineKey {
    pub fn new(surface: SurfaceId, line: u32) -> Self {
        Self { surface, line }
    }
}

/// Broadcast result of a despatched request. `applied_seq` covers every call
/// registered up to that sequence number for the key.
#[derive(Debug, Clone)]
struct Settlement {
    applied_seq: u64,
    outcome: Option<Result<CartState, StorefrontError>>,
}

/// Book-keeping for one line key.
struct LineFlight {
    next_seq: u64,
    /// `(seq, quantity)` currently on the wire, if any.
    driving: Option<(u64, i64)>,
    /// Newest queued `(seq, quantity)`, coalesced on every overwrite.
    queued: Option<(u64, i64)>,
    settlements: watch::Sender<Settlement>,
}

impl LineFlight {
    fn new() -> Self {
        let (settlements, _) = watch::channel(Settlement {
            applied_seq: 0,
            outcome: None,
        });
        Self {
            next_seq: 0,
            driving: None,
            queued: None,
            settlements,
        }
    }
}

enum Role {
    /// This call owns the wire: despatch now, then drain the queue.
    Drive { seq: u64, quantity: i64 },
    /// Another call owns the wire: wait until `wait_for` is covered.
    Wait { wait_for: u64 },
}

/// The cart synchronization engine.
///
/// Owns the storefront client, the per-line flight table, the registered
/// section sinks, and the authoritative-state broadcast channel.
pub struct CartSync {
    client: StorefrontClient,
    flights: Mutex<HashMap<LineKey, LineFlight>>,
    sinks: Mutex<Vec<Arc<dyn SectionSink>>>,
    cart_updates: watch::Sender<Option<CartState>>,
}

impl CartSync {
    /// Create an engine over a client.
    pub fn new(client: StorefrontClient) -> Self {
        let (cart_updates, _) = watch::channel(None);
        Self {
            client,
            flights: Mutex::new(HashMap::new()),
            sinks: Mutex::new(Vec::new()),
            cart_updates,
        }
    }

    /// Direct access to the storefront client (catalog fetches for list
    /// surfaces go through here).
    pub fn client(&self) -> &StorefrontClient {
        &self.client
    }

    /// Subscribe to authoritative cart snapshots. Every successful mutation
    /// and refresh publishes here; derived displays (the badge count)
    /// recompute wholesale from each snapshot.
    pub fn cart_updates(&self) -> watch::Receiver<Option<CartState>> {
        self.cart_updates.subscribe()
    }

    /// The latest observed cart, if any mutation or refresh has completed.
    pub fn latest_cart(&self) -> Option<CartState> {
        self.cart_updates.borrow().clone()
    }

    /// Register a sink for section fan-out.
    pub async fn register_sink(&self, sink: Arc<dyn SectionSink>) {
        self.sinks.lock().await.push(sink);
    }

    /// Unregister every sink attached under `key`.
    pub async fn unregister_sink(&self, key: &SurfaceId) {
        self.sinks.lock().await.retain(|s| &s.key() != key);
    }

    /// True while a request for `key` is on the wire. Surfaces use this to
    /// keep the line's quantity control disabled from request start to
    /// settle.
    pub async fn is_line_busy(&self, key: &LineKey) -> bool {
        self.flights
            .lock()
            .await
            .get(key)
            .map(|f| f.driving.is_some())
            .unwrap_or(false)
    }

    /// Add a variant to the cart and fan out section re-renders.
    ///
    /// Concurrent adds of the same variant are not coalesced - the server
    /// aggregates them into one line; double-submit suppression is the
    /// owning surface's job.
    pub async fn add_line(
        &self,
        variant_id: &VariantId,
        quantity: i64,
        properties: &[LineProperty],
    ) -> Result<CartState, StorefrontError> {
        let cart = self.client.add_line(variant_id, quantity, properties).await?;
        self.publish(&cart).await;
        Ok(cart)
    }

    /// Change a line's quantity under the single-flight contract. Quantity 0
    /// removes the line.
    pub async fn change_line(
        &self,
        key: LineKey,
        quantity: i64,
    ) -> Result<CartState, StorefrontError> {
        let (role, mut settlements) = {
            let mut flights = self.flights.lock().await;
            let flight = flights.entry(key.clone()).or_insert_with(LineFlight::new);
            flight.next_seq += 1;
            let seq = flight.next_seq;
            let rx = flight.settlements.subscribe();
            let role = match flight.driving {
                None => {
                    flight.driving = Some((seq, quantity));
                    Role::Drive { seq, quantity }
                }
                Some((driving_seq, driving_quantity)) => {
                    if driving_quantity == quantity && flight.queued.is_none() {
                        // Same quantity already on the wire: join it.
                        Role::Wait {
                            wait_for: driving_seq,
                        }
                    } else {
                        flight.queued = Some((seq, quantity));
                        Role::Wait { wait_for: seq }
                    }
                }
            };
            (role, rx)
        };

        match role {
            Role::Drive { seq, quantity } => self.drive(&key, seq, quantity).await,
            Role::Wait { wait_for } => self.await_settlement(&mut settlements, wait_for).await,
        }
    }

    /// Re-fetch the authoritative cart and fan out section re-renders.
    /// Used on panel open and whenever a surface wants a wholesale resync.
    pub async fn refresh(&self) -> Result<CartState, StorefrontError> {
        let cart = self.client.fetch_cart().await?;
        self.publish(&cart).await;
        Ok(cart)
    }

    /// Despatch the owning request, then drain whatever coalesced behind it.
    /// Returns the owning request's own outcome.
    async fn drive(
        &self,
        key: &LineKey,
        seq: u64,
        quantity: i64,
    ) -> Result<CartState, StorefrontError> {
        let own = self.perform(key, quantity).await;
        let mut next = self.settle(key, seq, own.clone()).await;
        while let Some((queued_seq, queued_quantity)) = next {
            let outcome = self.perform(key, queued_quantity).await;
            next = self.settle(key, queued_seq, outcome).await;
        }
        own
    }

    async fn perform(&self, key: &LineKey, quantity: i64) -> Result<CartState, StorefrontError> {
        let outcome = self.client.change_line(key.line, quantity).await;
        if let Ok(cart) = &outcome {
            self.publish(cart).await;
        }
        outcome
    }

    /// Broadcast a request's outcome and hand the wire to the queued
    /// request, if any.
    async fn settle(
        &self,
        key: &LineKey,
        seq: u64,
        outcome: Result<CartState, StorefrontError>,
    ) -> Option<(u64, i64)> {
        let mut flights = self.flights.lock().await;
        let flight = flights.get_mut(key)?;
        let _ = flight.settlements.send(Settlement {
            applied_seq: seq,
            outcome: Some(outcome),
        });
        match flight.queued.take() {
            Some((queued_seq, queued_quantity)) => {
                flight.driving = Some((queued_seq, queued_quantity));
                Some((queued_seq, queued_quantity))
            }
            None => {
                flight.driving = None;
                None
            }
        }
    }

    async fn await_settlement(
        &self,
        settlements: &mut watch::Receiver<Settlement>,
        wait_for: u64,
    ) -> Result<CartState, StorefrontError> {
        loop {
            {
                let settlement = settlements.borrow_and_update();
                if settlement.applied_seq >= wait_for {
                    if let Some(outcome) = settlement.outcome.clone() {
                        return outcome;
                    }
                }
            }
            if settlements.changed().await.is_err() {
                return Err(StorefrontError::Transport(
                    "cart sync dropped mid-flight".to_string(),
                ));
            }
        }
    }

    /// Publish the authoritative state and fan out fresh section fragments.
    /// A failed fragment fetch is logged and swallowed - the mutation
    /// already succeeded and only the visual refresh is stale.
    async fn publish(&self, cart: &CartState) {
        let _ = self.cart_updates.send(Some(cart.clone()));

        let (ids, sinks) = {
            let sinks = self.sinks.lock().await;
            let mut ids: BTreeSet<SectionId> = BTreeSet::new();
            for sink in sinks.iter() {
                ids.extend(sink.section_ids());
            }
            (ids.into_iter().collect::<Vec<_>>(), sinks.clone())
        };
        if ids.is_empty() {
            return;
        }

        match self.client.fetch_sections(&ids).await {
            Ok(rendered) => {
                for sink in &sinks {
                    sink.apply(&rendered);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "section refresh failed; cart state is authoritative");
            }
        }
    }
}
