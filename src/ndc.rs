//! National Drug Code normalization.
//!
//! User input arrives in every shape: `12345-6789-01`, `12345678901`,
//! `0123 4567 89`. Lookup against the NDC dataset is an exact string match on
//! the hyphenated product code, so the raw input is canonicalized first.
//!
//! Rules, applied to the ASCII digits of the input:
//! - 11 digits → `ddddd-dddd-dd` (5-4-2)
//! - 10 digits, raw input starting with `0` → `dddd-dddd-dd` (4-4-2)
//! - 10 digits otherwise → `ddddd-ddd-dd` (5-3-2)
//! - anything else → the raw input, untouched
//!
//! Normalization is total: it never fails, unparseable input is echoed back.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// Segment layout of a normalized NDC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NdcFormat {
    /// `ddddd-dddd-dd`
    Segmented542,
    /// `ddddd-ddd-dd`
    Segmented532,
    /// `dddd-dddd-dd`
    Segmented442,
    /// Digit count was neither 10 nor 11; the raw input was kept.
    Unknown,
}

impl NdcFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Segmented542 => "5-4-2",
            Self::Segmented532 => "5-3-2",
            Self::Segmented442 => "4-4-2",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// A drug code after normalization. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdcCode {
    code: String,
    format: NdcFormat,
}

impl NdcCode {
    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn format(&self) -> NdcFormat {
        self.format
    }

    /// File-name-safe rendering of the code, used to name report artifacts.
    /// Formatted codes pass through unchanged.
    pub fn file_stem(&self) -> String {
        self.code
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for NdcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for NdcCode {
    fn as_ref(&self) -> &str {
        &self.code
    }
}

impl Serialize for NdcCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

/// Canonicalize a raw drug code string.
pub fn normalize(raw: &str) -> NdcCode {
    let digits = NON_DIGITS.replace_all(raw, "");

    let (code, format) = match digits.len() {
        11 => (
            format!("{}-{}-{}", &digits[..5], &digits[5..9], &digits[9..]),
            NdcFormat::Segmented542,
        ),
        10 if raw.starts_with('0') => (
            format!("{}-{}-{}", &digits[..4], &digits[4..8], &digits[8..]),
            NdcFormat::Segmented442,
        ),
        10 => (
            format!("{}-{}-{}", &digits[..5], &digits[5..8], &digits[8..]),
            NdcFormat::Segmented532,
        ),
        _ => (raw.to_string(), NdcFormat::Unknown),
    };

    NdcCode { code, format }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_digits_become_542() {
        let ndc = normalize("12345678901");
        assert_eq!(ndc.as_str(), "12345-6789-01");
        assert_eq!(ndc.format(), NdcFormat::Segmented542);
    }

    #[test]
    fn ten_digits_with_leading_zero_become_442() {
        let ndc = normalize("0123456789");
        assert_eq!(ndc.as_str(), "0123-4567-89");
        assert_eq!(ndc.format(), NdcFormat::Segmented442);
    }

    #[test]
    fn ten_digits_without_leading_zero_become_532() {
        let ndc = normalize("1234567890");
        assert_eq!(ndc.as_str(), "12345-678-90");
        assert_eq!(ndc.format(), NdcFormat::Segmented532);
    }

    #[test]
    fn separators_and_spaces_are_stripped() {
        assert_eq!(normalize("12345 6789 01").as_str(), "12345-6789-01");
        assert_eq!(normalize("12345.6789.01").as_str(), "12345-6789-01");
    }

    #[test]
    fn leading_zero_rule_looks_at_raw_input() {
        // First raw character is a space, not '0', so 5-3-2 applies
        assert_eq!(normalize(" 0123456789").as_str(), "01234-567-89");
    }

    #[test]
    fn hyphenated_ten_digit_code_is_reformatted_by_leading_character() {
        assert_eq!(normalize("0002-3227-30").as_str(), "0002-3227-30");
        assert_eq!(normalize("50090-347-01").as_str(), "50090-347-01");
    }

    #[test]
    fn other_digit_counts_pass_through() {
        for raw in ["", "abc", "123", "123456789", "123456789012", "12-34"] {
            let ndc = normalize(raw);
            assert_eq!(ndc.as_str(), raw);
            assert_eq!(ndc.format(), NdcFormat::Unknown);
            assert!(!ndc.format().is_known());
        }
    }

    #[test]
    fn non_ascii_digits_are_not_counted() {
        // Arabic-Indic digits are not NDC digits
        let raw = "١٢٣٤٥٦٧٨٩٠١";
        assert_eq!(normalize(raw).as_str(), raw);
    }

    #[test]
    fn file_stem_replaces_path_characters() {
        assert_eq!(normalize("12345678901").file_stem(), "12345-6789-01");
        assert_eq!(normalize("../etc/x").file_stem(), "___etc_x");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&normalize("12345678901")).unwrap();
        assert_eq!(json, "\"12345-6789-01\"");
    }

    #[test]
    fn format_labels() {
        assert_eq!(NdcFormat::Segmented542.as_str(), "5-4-2");
        assert_eq!(NdcFormat::Unknown.as_str(), "unknown");
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Inputs whose digit count is not 10 or 11 come back unchanged
        #[test]
        fn passthrough_for_other_digit_counts(raw in "[0-9a-zA-Z -]{0,24}") {
            let count = raw.chars().filter(|c| c.is_ascii_digit()).count();
            prop_assume!(count != 10 && count != 11);
            let out = normalize(&raw);
            prop_assert_eq!(out.as_str(), raw.as_str());
        }

        /// Any 11-digit input formats as ddddd-dddd-dd
        #[test]
        fn eleven_digit_shape(digits in "[0-9]{11}") {
            let ndc = normalize(&digits);
            let re = Regex::new(r"^[0-9]{5}-[0-9]{4}-[0-9]{2}$").unwrap();
            prop_assert!(re.is_match(ndc.as_str()), "got {}", ndc);
        }

        /// 10-digit inputs split on the leading character
        #[test]
        fn ten_digit_shape(digits in "[0-9]{10}") {
            let ndc = normalize(&digits);
            let pattern = if digits.starts_with('0') {
                r"^[0-9]{4}-[0-9]{4}-[0-9]{2}$"
            } else {
                r"^[0-9]{5}-[0-9]{3}-[0-9]{2}$"
            };
            prop_assert!(Regex::new(pattern).unwrap().is_match(ndc.as_str()), "got {}", ndc);
        }

        /// Normalizing an already-formatted 11-digit code changes nothing
        #[test]
        fn eleven_digit_normalization_is_idempotent(digits in "[0-9]{11}") {
            let once = normalize(&digits);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        /// Digits are preserved in order
        #[test]
        fn digits_preserved(digits in "[0-9]{10,11}") {
            let ndc = normalize(&digits);
            let stripped: String = ndc.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(stripped, digits);
        }
    }
}
