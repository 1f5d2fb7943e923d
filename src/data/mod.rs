//! Static lookup tables: cushion variants and divine quotes.
//!
//! Both tables are process-wide and immutable. Targets hold `&'static Variant`
//! references into [`VARIANTS`]; nothing copies or mutates entries at runtime.

use std::fmt;

use crate::rng::RandomSource;

mod quotes;
mod variants;

pub use quotes::QUOTES;
pub use variants::VARIANTS;

/// Visual and scoring profile of a cushion.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Variant {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub theme: &'static str,
    /// Points awarded on activation; always positive.
    pub score_value: u32,
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Quote {
    pub deity: &'static str,
    pub quote: &'static str,
    pub theme: &'static str,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{}\"", self.deity, self.quote)
    }
}

pub fn find_variant(id: u32) -> Option<&'static Variant> {
    VARIANTS.iter().find(|v| v.id == id)
}

/// Variant with the given id, or the first variant when the id is unknown.
pub fn variant_by_id(id: u32) -> &'static Variant {
    find_variant(id).unwrap_or(&VARIANTS[0])
}

pub fn random_variant(rng: &mut dyn RandomSource) -> &'static Variant {
    &VARIANTS[rng.next_index(VARIANTS.len())]
}

pub fn random_quote(rng: &mut dyn RandomSource) -> &'static Quote {
    &QUOTES[rng.next_index(QUOTES.len())]
}

/// Random quote matching `theme`, falling back to any quote when none match.
pub fn quote_for_theme(theme: &str, rng: &mut dyn RandomSource) -> &'static Quote {
    pick_quote(&QUOTES, theme, rng).unwrap_or(&QUOTES[0])
}

fn pick_quote<'a>(pool: &'a [Quote], theme: &str, rng: &mut dyn RandomSource) -> Option<&'a Quote> {
    let themed: Vec<&Quote> = pool.iter().filter(|q| q.theme == theme).collect();
    if themed.is_empty() {
        return pool.get(rng.next_index(pool.len()));
    }
    Some(themed[rng.next_index(themed.len())])
}
