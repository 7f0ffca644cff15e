//! Canonicalization of loose proposal-identifier references.
//!
//! Cross-reference fields arrive in whatever form the export produced:
//! absent, a single string ("BIP 123", "bip-45, 72"), a bare number, or an
//! array mixing any of those. Normalization flattens all of it into an
//! ordered list of canonical numeric-string identifiers.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static BIP_PREFIX: OnceLock<Regex> = OnceLock::new();

fn bip_prefix() -> &'static Regex {
    BIP_PREFIX.get_or_init(|| Regex::new(r"(?i)^BIP[-\s]*").unwrap())
}

/// Normalize a raw cross-reference field into canonical identifiers.
///
/// - Absent/null input yields an empty list.
/// - Array input contributes one candidate per element (elements are NOT
///   comma-split); scalar input is stringified and split on commas.
/// - Each candidate is trimmed, a leading case-insensitive `BIP` prefix
///   (with any run of hyphens/whitespace after it) is stripped, and the
///   residue survives only if it is one or more decimal digits.
///
/// Order is preserved, duplicates are kept, and leading zeros survive as
/// part of the string form ("0007" stays "0007"). Non-numeric residue is a
/// validation filter, not an error.
pub fn normalize_ids(field: Option<&Value>) -> Vec<String> {
    let parts: Vec<String> = match field {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        Some(scalar) => stringify(scalar)
            .split(',')
            .map(str::to_string)
            .collect(),
    };

    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| bip_prefix().replace(part, "").into_owned())
        .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .collect()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_mixed_prefixes_and_noise() {
        let field = json!("BIP 123, bip-45, foo, 0007");
        assert_eq!(
            normalize_ids(Some(&field)),
            vec!["123".to_string(), "45".to_string(), "0007".to_string()]
        );
    }

    #[test]
    fn test_absent_and_null_are_empty() {
        assert!(normalize_ids(None).is_empty());
        assert!(normalize_ids(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_array_elements_are_not_comma_split() {
        // An array element is one candidate; an embedded comma makes it
        // non-numeric and it is dropped whole.
        let field = json!(["BIP-9", "10,11", 12]);
        assert_eq!(
            normalize_ids(Some(&field)),
            vec!["9".to_string(), "12".to_string()]
        );
    }

    #[test]
    fn test_prefix_strip_variants() {
        for (input, expected) in [
            ("BIP123", "123"),
            ("bip 123", "123"),
            ("Bip-123", "123"),
            ("BIP--  123", "123"),
        ] {
            let field = json!(input);
            assert_eq!(normalize_ids(Some(&field)), vec![expected.to_string()]);
        }
    }

    #[test]
    fn test_empty_and_whitespace_parts_discarded() {
        let field = json!(" , 5,, 6 ,");
        assert_eq!(
            normalize_ids(Some(&field)),
            vec!["5".to_string(), "6".to_string()]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let field = json!("8, BIP 8, 8");
        assert_eq!(normalize_ids(Some(&field)), vec!["8"; 3]);
    }

    #[test]
    fn test_bare_prefix_is_dropped() {
        let field = json!("BIP, BIP-");
        assert!(normalize_ids(Some(&field)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_survivors_are_all_digits(input in ".{0,64}") {
            let field = json!(input);
            for id in normalize_ids(Some(&field)) {
                prop_assert!(!id.is_empty());
                prop_assert!(id.bytes().all(|b| b.is_ascii_digit()));
            }
        }

        #[test]
        fn prop_numeric_lists_survive_in_order(ids in proptest::collection::vec(0u32..100_000, 1..8)) {
            let joined = ids
                .iter()
                .map(|n| format!("BIP {}", n))
                .collect::<Vec<_>>()
                .join(", ");
            let field = json!(joined);
            let expected: Vec<String> = ids.iter().map(|n| n.to_string()).collect();
            prop_assert_eq!(normalize_ids(Some(&field)), expected);
        }
    }
}
