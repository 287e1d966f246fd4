//! Fragment regions.

use std::collections::BTreeMap;
use std::sync::Mutex;
use vitrine_cart::{RenderedSections, SectionSink};
use vitrine_core::{SectionId, SurfaceId};

/// A named HTML region refreshed from section re-renders.
///
/// This is the concrete [`SectionSink`] surfaces hand to the sync engine:
/// header mini-cart, footer cart, drawer body, cart page body, badge markup.
/// Each fragment overwrites the region keyed by its stable section id, so
/// applying the same batch twice (or out of order) converges to the same
/// final state.
pub struct FragmentRegion {
    key: SurfaceId,
    sections: Vec<SectionId>,
    fragments: Mutex<BTreeMap<SectionId, String>>,
}

impl FragmentRegion {
    /// Create a region subscribed to the given section ids.
    pub fn new(key: SurfaceId, sections: Vec<SectionId>) -> Self {
        Self {
            key,
            sections,
            fragments: Mutex::new(BTreeMap::new()),
        }
    }

    /// The current HTML for a section, once a re-render delivered one.
    pub fn html(&self, id: &SectionId) -> Option<String> {
        self.fragments.lock().ok()?.get(id).cloned()
    }

    /// True once any fragment has been applied.
    pub fn has_content(&self) -> bool {
        self.fragments
            .lock()
            .map(|f| !f.is_empty())
            .unwrap_or(false)
    }
}

impl SectionSink for FragmentRegion {
    fn key(&self) -> SurfaceId {
        self.key.clone()
    }

    fn section_ids(&self) -> Vec<SectionId> {
        self.sections.clone()
    }

    fn apply(&self, sections: &RenderedSections) {
        let Ok(mut fragments) = self.fragments.lock() else {
            return;
        };
        for id in &self.sections {
            if let Some(html) = sections.get(id) {
                fragments.insert(id.clone(), html.to_string());
            }
        }
    }
}
