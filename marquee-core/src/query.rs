//! Query text normalization.

/// Normalizes a query into the key used by the trending store.
///
/// Trims, lower-cases and collapses inner whitespace runs to a single space.
/// Returns an empty string for whitespace-only input.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("batman"), "batman");
        assert_eq!(normalize_query("  The   Dark Knight "), "the dark knight");
        assert_eq!(normalize_query("\t\n "), "");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(query in "\\PC{0,40}") {
            let once = normalize_query(&query);
            prop_assert_eq!(normalize_query(&once), once.clone());
        }

        #[test]
        fn normalized_has_no_edge_whitespace(query in "[ a-zA-Z\\t]{0,40}") {
            let normalized = normalize_query(&query);
            prop_assert_eq!(normalized.trim(), normalized.as_str());
            prop_assert!(!normalized.contains("  "));
        }
    }
}
