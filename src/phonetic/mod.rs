//! Phonetic encoding of single terms

mod double_metaphone;

use crate::core::config::PhoneticConfig;
use serde::{Deserialize, Serialize};

/// Primary and alternate phonetic keys for a term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticCode {
    pub primary: Option<String>,
    pub alternate: Option<String>,
}

impl PhoneticCode {
    /// Both codes, primary first, skipping the missing ones
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.primary
            .as_deref()
            .into_iter()
            .chain(self.alternate.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.alternate.is_none()
    }
}

/// Double Metaphone encoder
///
/// Pure and deterministic. Callers are expected to hand it one token at a
/// time; punctuation inside a token is ignored.
#[derive(Debug, Clone, Copy)]
pub struct PhoneticEncoder {
    max_code_len: usize,
    alternate: bool,
}

impl PhoneticEncoder {
    pub const DEFAULT_MAX_CODE_LEN: usize = 4;

    pub fn new() -> Self {
        Self {
            max_code_len: Self::DEFAULT_MAX_CODE_LEN,
            alternate: true,
        }
    }

    pub fn from_config(config: &PhoneticConfig) -> Self {
        Self::new()
            .with_max_code_len(config.max_code_len)
            .with_alternate(config.alternate)
    }

    /// Codes longer than this are truncated (minimum 1)
    pub fn with_max_code_len(mut self, len: usize) -> Self {
        self.max_code_len = len.max(1);
        self
    }

    pub fn with_alternate(mut self, enabled: bool) -> Self {
        self.alternate = enabled;
        self
    }

    pub fn encode(&self, term: &str) -> PhoneticCode {
        let term = term.trim();
        if term.is_empty() {
            return PhoneticCode::default();
        }

        let encoded = double_metaphone::encode(term, self.max_code_len);
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        PhoneticCode {
            primary: non_empty(encoded.primary),
            alternate: if self.alternate {
                non_empty(encoded.alternate)
            } else {
                None
            },
        }
    }
}

impl Default for PhoneticEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_has_no_codes() {
        let encoder = PhoneticEncoder::new();
        assert_eq!(encoder.encode(""), PhoneticCode::default());
        assert_eq!(encoder.encode("   \t"), PhoneticCode::default());
        assert!(encoder.encode("").is_empty());
    }

    #[test]
    fn test_homophones_share_a_code() {
        let encoder = PhoneticEncoder::new();
        let pairs = [
            ("Smith", "Smyth"),
            ("Catherine", "Katherine"),
            ("Jon", "John"),
            ("Schmidt", "Smith"),
        ];
        for (a, b) in pairs {
            let a_codes: Vec<_> = encoder.encode(a).iter().map(String::from).collect();
            let b_codes = encoder.encode(b);
            assert!(
                b_codes.iter().any(|c| a_codes.iter().any(|x| x == c)),
                "{} and {} share no code",
                a,
                b
            );
        }
    }

    #[test]
    fn test_input_is_trimmed_and_case_folded() {
        let encoder = PhoneticEncoder::new();
        assert_eq!(encoder.encode("  robert "), encoder.encode("ROBERT"));
    }

    #[test]
    fn test_alternate_can_be_disabled() {
        let encoder = PhoneticEncoder::new().with_alternate(false);
        let code = encoder.encode("Smith");
        assert_eq!(code.primary.as_deref(), Some("SM0"));
        assert!(code.alternate.is_none());
    }

    #[test]
    fn test_from_config() {
        let encoder = PhoneticEncoder::from_config(&PhoneticConfig {
            max_code_len: 2,
            alternate: true,
        });
        let code = encoder.encode("Robert");
        assert_eq!(code.primary.as_deref(), Some("RP"));
        assert_eq!(code.iter().count(), 2);
    }

    #[test]
    fn test_unencodable_term_has_no_codes() {
        assert!(PhoneticEncoder::new().encode("42").is_empty());
    }
}
