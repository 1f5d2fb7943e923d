// Static table invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use whoopee_chaos::data::{QUOTES, VARIANTS, quote_for_theme, variant_by_id};
use whoopee_chaos::rng::ScriptedRandom;

#[test]
fn variant_ids_are_dense_and_unique() {
    for (i, v) in VARIANTS.iter().enumerate() {
        assert_eq!(v.id as usize, i, "variant '{}' out of order", v.name);
        assert!(v.score_value > 0, "variant '{}' has no score value", v.name);
        assert!(v.color.starts_with('#') && v.color.len() == 7, "bad color '{}' for '{}'", v.color, v.name);
        assert_eq!(variant_by_id(v.id), v);
    }
}

#[test]
fn variant_themes_are_unique_and_quoted() {
    let mut seen = HashSet::new();
    for v in VARIANTS.iter() {
        assert!(seen.insert(v.theme), "duplicate theme '{}'", v.theme);
        assert!(
            QUOTES.iter().any(|q| q.theme == v.theme),
            "no quote for variant theme '{}'",
            v.theme
        );
    }
}

#[test]
fn quotes_are_non_empty() {
    let mut deities = HashSet::new();
    for q in QUOTES.iter() {
        assert!(!q.quote.is_empty(), "empty quote for '{}'", q.deity);
        assert!(deities.insert(q.deity), "duplicate deity '{}'", q.deity);
    }
}

#[test]
fn every_theme_lookup_returns_a_quote() {
    let mut rng = ScriptedRandom::new(vec![3, 1, 7, 0]);
    for theme in ["thunder", "royal", "chaos", "", "no-such-theme"] {
        let q = quote_for_theme(theme, &mut rng);
        assert!(QUOTES.contains(q));
    }
}
