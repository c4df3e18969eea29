//! Mention normalization
//!
//! Produces comparable keys: lowercased, punctuation collapsed, whitespace
//! trimmed, and trailing legal-entity suffixes stripped.

/// Legal-entity suffix tokens stripped from the end of a name
///
/// Tokens are matched after punctuation removal, so "S.A." is "sa".
pub const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "corp", "corporation", "co", "company", "llc", "ltd",
    "limited", "plc", "gmbh", "ag", "sa", "nv", "bv", "kg", "oy", "ab", "srl",
    "spa", "pty", "lp", "llp", "sarl", "kk",
];

/// Whether `token` (already normalized) is a legal-entity suffix
pub fn is_legal_suffix(token: &str) -> bool {
    LEGAL_SUFFIXES.contains(&token)
}

/// Normalize a raw mention into a comparable key
///
/// Returns an empty string for input with no alphanumeric content; callers
/// drop such mentions.
///
/// # Examples
///
/// ```
/// use volt_resolver::normalize;
///
/// assert_eq!(normalize("Acme, Inc."), "acme");
/// assert_eq!(normalize("Siemens AG"), "siemens");
/// assert_eq!(normalize("McDonald’s Corporation"), "mcdonalds");
/// assert_eq!(normalize("--!!"), "");
/// ```
pub fn normalize(raw: &str) -> String {
    // Mis-decoded UTF-8 apostrophes show up in scraped text
    let repaired = raw
        .replace("â€™", "'")
        .replace(['\u{2019}', '\u{2018}'], "'");

    let mut cleaned = String::with_capacity(repaired.len());
    for ch in repaired.chars().flat_map(char::to_lowercase) {
        match ch {
            '\'' | '.' => {}
            c if c.is_alphanumeric() => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| is_legal_suffix(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Key with its tokens sorted, for order-insensitive comparison
pub fn token_sorted(key: &str) -> String {
    let mut tokens: Vec<&str> = key.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: normalizing a key again leaves it unchanged
        #[test]
        fn test_normalize_is_idempotent(raw in "[a-zA-Z0-9éü .,&'’()-]{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Property: keys carry no surrounding or repeated whitespace
        #[test]
        fn test_normalized_whitespace(raw in "[a-zA-Z .,&'-]{0,30}") {
            let key = normalize(&raw);
            prop_assert_eq!(key.trim(), key.as_str());
            prop_assert!(!key.contains("  "));
        }
    }
}
