//! Display projection for a product + selection.

use std::collections::BTreeSet;
use vitrine_catalog::{resolver, OptionSelection, Product};
use vitrine_core::{ThemeConfig, VariantId};

/// What a product surface should currently display.
///
/// Pure projection of `(product, selection, config)`: price and compare-at
/// rendered through the theme's money format, availability, the image to
/// swap in, and the per-position sets of values still worth offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantView {
    /// The resolved variant, when the selection pins exactly one.
    pub variant_id: Option<VariantId>,
    /// Rendered price of the resolved variant.
    pub price: Option<String>,
    /// Rendered compare-at price, when the variant is on sale.
    pub compare_at: Option<String>,
    /// SKU of the resolved variant.
    pub sku: Option<String>,
    /// Image to display for the resolved variant.
    pub image: Option<String>,
    /// Whether the resolved variant can be purchased.
    pub available: bool,
    /// Whether the buy control should accept a click.
    pub buy_enabled: bool,
    /// Label for the buy control (add-to-cart / sold-out / unavailable).
    pub buy_label: String,
    /// Per option position: the values backed by at least one available
    /// variant consistent with the rest of the selection.
    pub enabled_values: Vec<BTreeSet<String>>,
}

impl VariantView {
    /// Project the current display state.
    pub fn project(product: &Product, selection: &OptionSelection, config: &ThemeConfig) -> Self {
        let resolved = resolver::resolve(&product.variants, selection);

        let enabled_values = (0..product.option_count())
            .map(|position| resolver::available_values(&product.variants, selection, position))
            .collect();

        match resolved {
            Some(variant) => {
                let buy_enabled = variant.available;
                let buy_label = if variant.available {
                    config.strings.add_to_cart.clone()
                } else {
                    config.strings.sold_out.clone()
                };
                Self {
                    variant_id: Some(variant.id.clone()),
                    price: Some(config.money_format.render(&variant.price)),
                    compare_at: variant
                        .compare_at_price
                        .filter(|_| variant.is_on_sale())
                        .map(|cap| config.money_format.render(&cap)),
                    sku: (!variant.sku.is_empty()).then(|| variant.sku.clone()),
                    image: variant.featured_image.as_ref().map(|img| img.src.clone()),
                    available: variant.available,
                    buy_enabled,
                    buy_label,
                    enabled_values,
                }
            }
            None => Self {
                variant_id: None,
                price: None,
                compare_at: None,
                sku: None,
                image: None,
                available: false,
                buy_enabled: false,
                buy_label: config.strings.unavailable.clone(),
                enabled_values,
            },
        }
    }
}
