//! Top-K selection over language tallies

use skillify_core::LanguageTally;

/// The `k` languages with the most bytes, bytes descending.
///
/// Ties are broken by language name so the result never depends on sort
/// stability or map iteration order.
pub fn select_top(tally: &LanguageTally, k: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = tally
        .iter()
        .map(|(language, bytes)| (language.to_string(), bytes))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

/// Every language in the tally, sorted by name
pub fn all_languages(tally: &LanguageTally) -> Vec<String> {
    // LanguageTally iterates in key order already
    tally.iter().map(|(language, _)| language.to_string()).collect()
}
