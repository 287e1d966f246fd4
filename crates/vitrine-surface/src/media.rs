//! Broken-image fallback.

use std::collections::HashMap;

/// What the host should do about a failed image load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackAction {
    /// Re-assign the source and try again.
    Retry,
    /// Give up and render the placeholder markup.
    Placeholder(String),
}

/// A single policy for broken product images.
///
/// Registration is idempotent: an image key is tracked at most once, however
/// many regions reference it. Each load error consumes one retry; once
/// retries are exhausted the action is a deterministic placeholder render.
#[derive(Debug)]
pub struct ImageFallbackPolicy {
    max_retries: u32,
    placeholder: String,
    attempts: HashMap<String, u32>,
}

impl ImageFallbackPolicy {
    /// Create a policy with an explicit retry budget and placeholder markup.
    pub fn new(max_retries: u32, placeholder: impl Into<String>) -> Self {
        Self {
            max_retries,
            placeholder: placeholder.into(),
            attempts: HashMap::new(),
        }
    }

    /// Track an image. Returns false when the key was already registered.
    pub fn register(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.attempts.contains_key(&key) {
            return false;
        }
        self.attempts.insert(key, 0);
        true
    }

    /// True when the key is tracked.
    pub fn is_registered(&self, key: &str) -> bool {
        self.attempts.contains_key(key)
    }

    /// Record a load error and decide the next step. Unregistered keys are
    /// registered on the fly.
    pub fn on_error(&mut self, key: &str) -> FallbackAction {
        let attempts = self.attempts.entry(key.to_string()).or_insert(0);
        *attempts += 1;
        if *attempts <= self.max_retries {
            FallbackAction::Retry
        } else {
            FallbackAction::Placeholder(self.placeholder.clone())
        }
    }

    /// Record a successful load, resetting the key's retry budget.
    pub fn on_load(&mut self, key: &str) {
        if let Some(attempts) = self.attempts.get_mut(key) {
            *attempts = 0;
        }
    }
}

impl Default for ImageFallbackPolicy {
    fn default() -> Self {
        Self::new(
            2,
            r#"<svg class="placeholder" viewBox="0 0 120 120" aria-hidden="true"><rect width="120" height="120"/></svg>"#,
        )
    }
}
