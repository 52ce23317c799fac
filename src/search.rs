//! Course code search: autocomplete suggestions and query finalization.
//!
//! The query buffer holds space-separated course codes; only the last token
//! is live for matching, earlier tokens are treated as already-chosen codes.

use std::collections::HashSet;

use crate::services::course_api::CatalogEntry;

/// Maximum number of autocomplete suggestions returned for one query.
pub const SUGGESTION_CAP: usize = 15;

/// Splits a query buffer into uppercased, space-separated tokens.
///
/// An empty buffer has no tokens. With `drop_trailing_empty`, the single
/// empty token produced by a trailing space is removed; interior empty
/// tokens stay, so token positions mirror the typed buffer.
pub fn parse_query(input: &str, drop_trailing_empty: bool) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    let mut tokens: Vec<String> = input.to_uppercase().split(' ').map(str::to_string).collect();
    if drop_trailing_empty && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Returns catalog entries whose code or name starts with the last query
/// token, case-insensitively, in catalog order, capped at
/// [`SUGGESTION_CAP`]. An empty buffer or a buffer ending in a space yields
/// nothing, since there is no live token to match.
pub fn suggest<'a>(catalog: &'a [CatalogEntry], input: &str) -> Vec<&'a CatalogEntry> {
    let tokens = parse_query(input, false);
    let token = match tokens.last() {
        Some(token) if !token.is_empty() => token.as_str(),
        _ => return Vec::new(),
    };

    let mut suggestions = Vec::new();
    for entry in catalog {
        if suggestions.len() >= SUGGESTION_CAP {
            break;
        }
        if entry.code.to_uppercase().starts_with(token)
            || entry.name.to_uppercase().starts_with(token)
        {
            suggestions.push(entry);
        }
    }
    suggestions
}

/// Replaces the live (last) token of the buffer with the chosen code and
/// appends a trailing space, leaving the buffer ready for the next code.
pub fn complete(input: &str, code: &str) -> String {
    let upper = input.to_uppercase();
    let tokens = parse_query(&upper, false);
    let live_len = tokens.last().map_or(0, String::len);

    let mut completed = upper[..upper.len() - live_len].to_string();
    completed.push_str(code);
    completed.push(' ');
    completed
}

/// Finalizes the query buffer into the list of codes to fetch: uppercased
/// tokens, trailing empty token dropped, duplicates removed, codes unknown
/// to the catalog silently discarded.
///
/// Resolution intersects the catalog with the token set, so the result
/// follows catalog order rather than typed order.
pub fn resolve_codes(catalog: &[CatalogEntry], input: &str) -> Vec<String> {
    let wanted: HashSet<String> = parse_query(input, true).into_iter().collect();
    catalog
        .iter()
        .filter(|entry| wanted.contains(&entry.code))
        .map(|entry| entry.code.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, name: &str) -> CatalogEntry {
        CatalogEntry {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn eda_catalog(copies: usize) -> Vec<CatalogEntry> {
        vec![entry("EDA322", "Digital Konstruktion"); copies]
    }

    #[test]
    fn test_parse_query_uppercases_tokens() {
        assert_eq!(parse_query("eda322 tda418", false), ["EDA322", "TDA418"]);
    }

    #[test]
    fn test_parse_query_trailing_empty_token() {
        assert_eq!(parse_query("eda322 ", false), ["EDA322", ""]);
        assert_eq!(parse_query("eda322 ", true), ["EDA322"]);
        assert!(parse_query("", true).is_empty());
    }

    #[test]
    fn test_suggest_matches_code_and_name_prefix() {
        let catalog = vec![
            entry("EDA322", "Digital Konstruktion"),
            entry("TDA418", "Datastrukturer"),
        ];

        let by_code: Vec<_> = suggest(&catalog, "eda").iter().map(|e| &e.code).collect();
        assert_eq!(by_code, ["EDA322"]);

        let by_name: Vec<_> = suggest(&catalog, "digi").iter().map(|e| &e.code).collect();
        assert_eq!(by_name, ["EDA322"]);
    }

    #[test]
    fn test_suggest_cap_at_exactly_fifteen_matches() {
        let catalog = eda_catalog(15);
        assert_eq!(suggest(&catalog, "e").len(), 15);
    }

    #[test]
    fn test_suggest_cap_with_more_matches() {
        let catalog = eda_catalog(40);
        assert_eq!(suggest(&catalog, "e").len(), SUGGESTION_CAP);
    }

    #[test]
    fn test_suggest_empty_query_yields_nothing() {
        let catalog = eda_catalog(3);
        assert!(suggest(&catalog, "").is_empty());
    }

    #[test]
    fn test_suggest_trailing_separator_yields_nothing() {
        let catalog = eda_catalog(3);
        assert!(suggest(&catalog, "e ").is_empty());
    }

    #[test]
    fn test_suggest_matches_last_token_only() {
        let catalog = vec![
            entry("XXX111", "Xenobiology"),
            entry("EDA322", "Digital Konstruktion"),
        ];

        // "x" is a finalized earlier token; only "e" is live
        let live: Vec<_> = suggest(&catalog, "x e").iter().map(|e| &e.code).collect();
        assert_eq!(live, ["EDA322"]);

        let live: Vec<_> = suggest(&catalog, "e e").iter().map(|e| &e.code).collect();
        assert_eq!(live, ["EDA322"]);
    }

    #[test]
    fn test_complete_replaces_live_token() {
        assert_eq!(complete("eda3", "EDA322"), "EDA322 ");
        assert_eq!(complete("eda322 td", "TDA418"), "EDA322 TDA418 ");
    }

    #[test]
    fn test_complete_on_trailing_space_appends() {
        assert_eq!(complete("eda322 ", "TDA418"), "EDA322 TDA418 ");
    }

    #[test]
    fn test_resolve_codes_dedupes_and_follows_catalog_order() {
        let catalog = vec![
            entry("EDA322", "Digital Konstruktion"),
            entry("TDA418", "Datastrukturer"),
        ];

        let resolved = resolve_codes(&catalog, "tda418 eda322 tda418 ");
        assert_eq!(resolved, ["EDA322", "TDA418"]);
    }

    #[test]
    fn test_resolve_codes_drops_unknown_codes() {
        let catalog = vec![entry("EDA322", "Digital Konstruktion")];

        let resolved = resolve_codes(&catalog, "zzz999 eda322");
        assert_eq!(resolved, ["EDA322"]);

        assert!(resolve_codes(&catalog, "zzz999").is_empty());
        assert!(resolve_codes(&catalog, "").is_empty());
    }
}
