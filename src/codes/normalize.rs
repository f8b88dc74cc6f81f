use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Canonical form of an ICD code: uppercase, no whitespace, and a dot after
/// the category (first three characters) when the code has none.
pub fn normalize(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let clean = WHITESPACE.replace_all(&upper, "");

    if clean.contains('.') || clean.chars().count() < 4 {
        return clean.into_owned();
    }

    // Split on a char boundary, codes are not guaranteed to be ASCII
    let split = clean
        .char_indices()
        .nth(3)
        .map(|(idx, _)| idx)
        .unwrap_or(clean.len());
    format!("{}.{}", &clean[..split], &clean[split..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserts_dot_after_category() {
        assert_eq!(normalize("E0800"), "E08.00");
        assert_eq!(normalize("A010"), "A01.0");
    }

    #[test]
    fn test_short_codes_unchanged() {
        assert_eq!(normalize("E08"), "E08");
        assert_eq!(normalize("e0"), "E0");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_existing_dot_kept() {
        assert_eq!(normalize("E08.00"), "E08.00");
        assert_eq!(normalize("E0.800"), "E0.800");
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize("e08 00"), normalize("E0800"));
        assert_eq!(normalize("  e08\t0 0\n"), "E08.00");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["E0800", "e08 00", "E08", "E08.00", "z 9 9 9 9 9", "", "ß123"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_non_ascii_split() {
        assert_eq!(normalize("é123"), "É12.3");
    }
}
