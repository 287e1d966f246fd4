//! HTTP despatch to the storefront endpoints.

use crate::error::StorefrontError;
use crate::sections::RenderedSections;
use crate::state::{CartState, LineProperty};
use crate::wire::{CartJson, MutationErrorJson, ProductJson};
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::time::Duration;
use vitrine_catalog::Product;
use vitrine_core::{Currency, SectionId, ThemeConfig, VariantId};

/// Typed client for the platform's cart and catalog endpoints.
///
/// The endpoints are a fixed, third-party surface; this client only shapes
/// requests, classifies failures, and converts payloads into domain types.
/// Nothing is retried automatically - a failed mutation is surfaced to the
/// caller and displayed, matching the storefront's observed behavior.
pub struct StorefrontClient {
    http: reqwest::Client,
    base: String,
    currency: Currency,
}

impl StorefrontClient {
    /// Build a client from theme configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &ThemeConfig) -> Result<Self, StorefrontError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            base: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency,
        })
    }

    /// The shop currency used when payloads do not carry one.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Fetch the authoritative cart.
    pub async fn fetch_cart(&self) -> Result<CartState, StorefrontError> {
        let url = format!("{}/cart.json", self.base);
        tracing::debug!(%url, "fetching cart");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorefrontError::Transport(format!(
                "GET {url} returned {status}"
            )));
        }
        let body = response.text().await?;
        let cart: CartJson = serde_json::from_str(&body)
            .map_err(|e| StorefrontError::Deserialize(format!("cart payload: {e}")))?;
        Ok(cart.into_state(self.currency))
    }

    /// Add a variant to the cart.
    ///
    /// The add endpoint returns only the added line, so a successful add is
    /// followed by an authoritative cart fetch and the full [`CartState`] is
    /// returned.
    pub async fn add_line(
        &self,
        variant_id: &VariantId,
        quantity: i64,
        properties: &[LineProperty],
    ) -> Result<CartState, StorefrontError> {
        let url = format!("{}/cart/add.js", self.base);
        let mut body = serde_json::json!({
            "id": variant_id.as_str(),
            "quantity": quantity,
        });
        if !properties.is_empty() {
            let map: serde_json::Map<String, serde_json::Value> = properties
                .iter()
                .map(|p| (p.name.clone(), serde_json::Value::String(p.value.clone())))
                .collect();
            body["properties"] = serde_json::Value::Object(map);
        }

        tracing::debug!(variant = %variant_id, quantity, "adding line to cart");
        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.mutation_error(status, response, None).await);
        }
        self.fetch_cart().await
    }

    /// Change a line's quantity. Quantity 0 removes the line.
    ///
    /// Returns the full cart the change endpoint responds with.
    pub async fn change_line(
        &self,
        line: u32,
        quantity: i64,
    ) -> Result<CartState, StorefrontError> {
        let url = format!("{}/cart/change.js", self.base);
        let body = serde_json::json!({ "line": line, "quantity": quantity });

        tracing::debug!(line, quantity, "changing cart line");
        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.mutation_error(status, response, Some(line)).await);
        }
        let body = response.text().await?;
        let cart: CartJson = serde_json::from_str(&body)
            .map_err(|e| StorefrontError::Deserialize(format!("cart payload: {e}")))?;
        Ok(cart.into_state(self.currency))
    }

    /// Fetch a product with its full variant list.
    pub async fn fetch_product(&self, handle: &str) -> Result<Product, StorefrontError> {
        let url = format!("{}/products/{handle}.js", self.base);
        let catalog_err = |message: String| StorefrontError::CatalogFetch {
            handle: handle.to_string(),
            message,
        };

        tracing::debug!(handle, "fetching product");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| catalog_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(catalog_err(format!("endpoint returned {status}")));
        }
        let body = response
            .text()
            .await
            .map_err(|e| catalog_err(e.to_string()))?;
        let product: ProductJson =
            serde_json::from_str(&body).map_err(|e| catalog_err(e.to_string()))?;
        Ok(product.into_product(self.currency))
    }

    /// Fetch fresh server-rendered fragments for the given section ids.
    pub async fn fetch_sections(
        &self,
        ids: &[SectionId],
    ) -> Result<RenderedSections, StorefrontError> {
        if ids.is_empty() {
            return Ok(RenderedSections::default());
        }
        let joined = ids
            .iter()
            .map(SectionId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/?sections={joined}", self.base);

        tracing::debug!(sections = %joined, "fetching rendered sections");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StorefrontError::SectionRender(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorefrontError::SectionRender(format!(
                "endpoint returned {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| StorefrontError::SectionRender(e.to_string()))?;
        // Unknown section ids come back as null and are dropped here.
        let map: BTreeMap<String, Option<String>> = serde_json::from_str(&body)
            .map_err(|e| StorefrontError::SectionRender(format!("sections payload: {e}")))?;
        let fragments = map
            .into_iter()
            .filter_map(|(id, html)| html.map(|h| (SectionId::new(id), h)))
            .collect();
        Ok(RenderedSections::from_fragments(fragments))
    }

    async fn mutation_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        line: Option<u32>,
    ) -> StorefrontError {
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<MutationErrorJson>(&body)
                .ok()
                .and_then(MutationErrorJson::into_message),
            Err(_) => None,
        }
        .unwrap_or_else(|| format!("cart endpoint returned {status}"));
        tracing::warn!(status = status.as_u16(), ?line, %message, "cart mutation rejected");
        StorefrontError::Mutation {
            status: status.as_u16(),
            message,
            line,
        }
    }
}
