//! Variant resolution.
//!
//! Pure matching between a (possibly partial) option selection and a
//! product's variant list. Matching is exact string equality per position;
//! there is no fuzzy or partial-best matching. Every surface shares these
//! functions instead of carrying its own copy of the logic.

use crate::product::Variant;
use crate::selection::OptionSelection;
use std::collections::BTreeSet;

/// Find the variant pinned down by `selection`.
///
/// A variant matches when its option tuple equals the selection at every
/// chosen position. Returns:
/// - the server-declared first variant when nothing is chosen yet (the
///   default selection, regardless of availability);
/// - `None` when the selection arity does not match the catalog, or when
///   zero or more than one variant matches (ambiguous or malformed catalog
///   data - treated as unavailable).
pub fn resolve<'a>(variants: &'a [Variant], selection: &OptionSelection) -> Option<&'a Variant> {
    if selection.is_unset() {
        return default_variant(variants);
    }

    let mut matched: Option<&Variant> = None;
    for variant in variants {
        if variant.options.len() != selection.len() {
            return None;
        }
        if matches_selection(variant, selection) {
            if matched.is_some() {
                // Two variants satisfy the same selection: malformed catalog.
                return None;
            }
            matched = Some(variant);
        }
    }
    matched
}

/// The server-declared first variant, never a computed pick.
pub fn default_variant(variants: &[Variant]) -> Option<&Variant> {
    variants.first()
}

/// The values at `position` that are still worth offering: each appears in
/// at least one `available` variant consistent with the values chosen at
/// every *other* position. Values absent from the catalog are never
/// included.
pub fn available_values(
    variants: &[Variant],
    selection: &OptionSelection,
    position: usize,
) -> BTreeSet<String> {
    variants
        .iter()
        .filter(|v| v.available)
        .filter(|v| consistent_except(v, selection, position))
        .filter_map(|v| v.options.get(position).cloned())
        .collect()
}

/// Distinct values at `position` across the whole catalog, in catalog order.
/// Used to render the full set of option controls (enabled or not).
pub fn values_at(variants: &[Variant], position: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    for variant in variants {
        if let Some(value) = variant.options.get(position) {
            if seen.insert(value.clone()) {
                values.push(value.clone());
            }
        }
    }
    values
}

fn matches_selection(variant: &Variant, selection: &OptionSelection) -> bool {
    selection
        .chosen()
        .all(|(position, value)| variant.options.get(position).map(String::as_str) == Some(value))
}

/// Consistency with the selection, ignoring the position under inspection.
fn consistent_except(variant: &Variant, selection: &OptionSelection, position: usize) -> bool {
    selection
        .chosen()
        .filter(|(p, _)| *p != position)
        .all(|(p, value)| variant.options.get(p).map(String::as_str) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Inventory;
    use vitrine_core::{Currency, Money, VariantId};

    fn variant(id: &str, options: &[&str], available: bool) -> Variant {
        Variant {
            id: VariantId::new(id),
            sku: format!("SKU-{id}"),
            options: options.iter().map(|s| s.to_string()).collect(),
            available,
            price: Money::new(1999, Currency::USD),
            compare_at_price: None,
            featured_image: None,
            inventory: Inventory::untracked(),
        }
    }

    /// Color: Red/Blue, Size: S/M; [Red, M] is sold out.
    fn two_option_catalog() -> Vec<Variant> {
        vec![
            variant("red-s", &["Red", "S"], true),
            variant("red-m", &["Red", "M"], false),
            variant("blue-s", &["Blue", "S"], true),
            variant("blue-m", &["Blue", "M"], true),
        ]
    }

    fn selection(values: &[Option<&str>]) -> OptionSelection {
        OptionSelection::from_values(values.iter().map(|v| v.map(String::from)).collect())
    }

    #[test]
    fn test_full_selection_resolves_unique_variant() {
        let variants = two_option_catalog();
        let resolved = resolve(&variants, &selection(&[Some("Blue"), Some("M")])).unwrap();
        assert_eq!(resolved.id, VariantId::new("blue-m"));
    }

    #[test]
    fn test_full_selection_without_match_resolves_none() {
        let variants = two_option_catalog();
        assert!(resolve(&variants, &selection(&[Some("Green"), Some("M")])).is_none());
    }

    #[test]
    fn test_unset_selection_resolves_declared_first_variant() {
        // First variant wins even when a later one is the only available one.
        let variants = vec![
            variant("a", &["Red"], false),
            variant("b", &["Blue"], true),
        ];
        let resolved = resolve(&variants, &selection(&[None])).unwrap();
        assert_eq!(resolved.id, VariantId::new("a"));
    }

    #[test]
    fn test_partial_selection_resolves_only_when_unambiguous() {
        let variants = two_option_catalog();
        // Two variants share Color=Red: ambiguous.
        assert!(resolve(&variants, &selection(&[Some("Red"), None])).is_none());

        // A partial selection that pins exactly one variant resolves.
        let single = vec![
            variant("red-s", &["Red", "S"], true),
            variant("blue-m", &["Blue", "M"], true),
        ];
        let resolved = resolve(&single, &selection(&[Some("Blue"), None])).unwrap();
        assert_eq!(resolved.id, VariantId::new("blue-m"));
    }

    #[test]
    fn test_duplicate_tuples_resolve_none() {
        let variants = vec![
            variant("a", &["Red", "S"], true),
            variant("b", &["Red", "S"], true),
        ];
        assert!(resolve(&variants, &selection(&[Some("Red"), Some("S")])).is_none());
    }

    #[test]
    fn test_arity_mismatch_resolves_none() {
        let variants = two_option_catalog();
        assert!(resolve(&variants, &selection(&[Some("Red")])).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(resolve(&[], &selection(&[None])).is_none());
        assert!(default_variant(&[]).is_none());
    }

    #[test]
    fn test_available_values_excludes_sold_out_combinations() {
        let variants = two_option_catalog();

        // Color=Red chosen: only Size=S is backed by an available variant.
        let red = selection(&[Some("Red"), None]);
        let sizes = available_values(&variants, &red, 1);
        assert_eq!(sizes, BTreeSet::from(["S".to_string()]));

        // Color=Blue chosen: both sizes available.
        let blue = selection(&[Some("Blue"), None]);
        let sizes = available_values(&variants, &blue, 1);
        assert_eq!(sizes, BTreeSet::from(["S".to_string(), "M".to_string()]));
    }

    #[test]
    fn test_available_values_ignores_the_inspected_position() {
        let variants = two_option_catalog();
        // With Size=M already chosen, the color control still offers Blue
        // (the one color with an available M) and drops Red.
        let sel = selection(&[Some("Red"), Some("M")]);
        let colors = available_values(&variants, &sel, 0);
        assert_eq!(colors, BTreeSet::from(["Blue".to_string()]));
    }

    #[test]
    fn test_available_values_never_invents_values() {
        let variants = two_option_catalog();
        let sel = selection(&[Some("Green"), None]);
        assert!(available_values(&variants, &sel, 1).is_empty());
    }

    #[test]
    fn test_values_at_preserves_catalog_order() {
        let variants = two_option_catalog();
        assert_eq!(values_at(&variants, 0), vec!["Red", "Blue"]);
        assert_eq!(values_at(&variants, 1), vec!["S", "M"]);
        assert!(values_at(&variants, 2).is_empty());
    }
}
