//! Name Normalizer.
//!
//! Boundary files and survey tables spell place names independently
//! ("Uttar Pradesh", "UTTAR-PRADESH.", "uttarpradesh"). Both sides are
//! reduced to the same key before joining: uppercase, with spaces,
//! hyphens, and periods removed.

use std::fmt::Display;

/// Canonical join key for a place name.
///
/// Accepts anything with a string representation so that numeric or
/// otherwise non-text names still produce a key instead of failing.
#[must_use]
pub fn normalize<T: Display + ?Sized>(name: &T) -> String {
    name.to_string()
        .to_uppercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case_spaces_hyphens_and_periods() {
        let expected = normalize("Uttar Pradesh");
        assert_eq!(expected, "UTTARPRADESH");
        assert_eq!(normalize("UTTAR-PRADESH."), expected);
        assert_eq!(normalize("uttarpradesh"), expected);
    }

    #[test]
    fn is_idempotent() {
        for name in ["Sri Potti Sriramulu Nellore", "N.C.T. of Delhi", "Jammu & Kashmir", ""] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn keeps_other_punctuation() {
        assert_eq!(normalize("Jammu & Kashmir"), "JAMMU&KASHMIR");
        assert_eq!(normalize("Dadra (Nagar Haveli)"), "DADRA(NAGARHAVELI)");
    }

    #[test]
    fn converts_non_text_names() {
        assert_eq!(normalize(&42), "42");
        assert_eq!(normalize(&f64::NAN), "NAN");
    }
}
