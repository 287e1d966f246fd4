//! Section re-rendering.
//!
//! A section is a named, server-rendered HTML region (header mini-cart,
//! footer cart, cart drawer, cart page body, badge). After any successful
//! mutation the sync engine fetches fresh fragments for every registered
//! section id and hands them to each sink. Sinks overwrite idempotent
//! regions keyed by stable ids, so convergence holds even when fragments
//! arrive out of order.

use std::collections::BTreeMap;
use vitrine_core::{SectionId, SurfaceId};

/// Fresh HTML fragments, one per requested section id.
///
/// Sections the server declined to render (unknown ids come back null) are
/// simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSections {
    fragments: BTreeMap<SectionId, String>,
}

impl RenderedSections {
    /// Build from parsed fragments.
    pub fn from_fragments(fragments: BTreeMap<SectionId, String>) -> Self {
        Self { fragments }
    }

    /// The fragment for a section, if the server rendered one.
    pub fn get(&self, id: &SectionId) -> Option<&str> {
        self.fragments.get(id).map(String::as_str)
    }

    /// Section ids present in this batch.
    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.fragments.keys()
    }

    /// Iterate over `(id, fragment)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&SectionId, &str)> {
        self.fragments.iter().map(|(id, html)| (id, html.as_str()))
    }

    /// Number of rendered fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True when the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// A consumer of re-rendered fragments, registered with the sync engine.
///
/// One sink per surface that mirrors cart state into a DOM region. `apply`
/// must be idempotent: the same batch delivered twice leaves the same final
/// state.
pub trait SectionSink: Send + Sync {
    /// Stable identity, used to unregister the sink.
    fn key(&self) -> SurfaceId;

    /// The section ids this sink wants refreshed after mutations.
    fn section_ids(&self) -> Vec<SectionId>;

    /// Accept a batch of fresh fragments. Ids the sink did not ask for may
    /// be present and should be ignored.
    fn apply(&self, sections: &RenderedSections);
}
