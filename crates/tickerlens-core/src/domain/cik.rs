use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_CIK_LEN: usize = 10;

/// SEC Central Index Key, stored without leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cik(String);

impl Cik {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("CIK")
            .or_else(|| trimmed.strip_prefix("cik"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(ValidationError::EmptyCik);
        }

        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ValidationError::CikNotNumeric {
                value: trimmed.to_owned(),
            });
        }

        if digits.len() > MAX_CIK_LEN {
            return Err(ValidationError::CikTooLong {
                len: digits.len(),
                max: MAX_CIK_LEN,
            });
        }

        let stripped = digits.trim_start_matches('0');
        let canonical = if stripped.is_empty() { "0" } else { stripped };
        Ok(Self(canonical.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ten-digit, zero-padded form used by EDGAR URLs.
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.0, width = MAX_CIK_LEN)
    }
}

impl Display for Cik {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.padded())
    }
}

impl TryFrom<String> for Cik {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cik> for String {
    fn from(value: Cik) -> Self {
        value.padded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_ten_digits() {
        let cik = Cik::parse("320193").expect("valid cik");
        assert_eq!(cik.padded(), "0000320193");
        assert_eq!(cik.to_string(), "0000320193");
    }

    #[test]
    fn strips_prefix_and_leading_zeros() {
        let cik = Cik::parse("CIK0000789019").expect("valid cik");
        assert_eq!(cik.as_str(), "789019");
    }

    #[test]
    fn rejects_non_numeric() {
        let err = Cik::parse("12a4").expect_err("must fail");
        assert!(matches!(err, ValidationError::CikNotNumeric { .. }));
    }
}
