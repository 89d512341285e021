// ABOUTME: Container number normalization and check-digit validation.
// ABOUTME: Four owner letters, six serial digits, and one self-verifying check digit.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Total length of a container number.
pub const CONTAINER_NUMBER_LEN: usize = 11;

/// Number of leading characters that feed the check digit.
pub const CHECK_DIGIT_PREFIX_LEN: usize = 10;

const OWNER_CODE_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerNumberError {
    #[error("container number must be 4 letters followed by 7 digits (got {len} characters)")]
    InvalidFormat { len: usize },

    #[error("invalid character '{found}' at position {position} of container number")]
    InvalidCharacter { position: usize, found: char },

    #[error("check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },
}

/// A validated, normalized container number such as `EFGH0000002`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerNumber(String);

impl ContainerNumber {
    /// Normalize (drop whitespace, uppercase) and validate a container number.
    pub fn parse(raw: &str) -> Result<Self, ContainerNumberError> {
        let normalized = normalize(raw);
        if normalized.len() != CONTAINER_NUMBER_LEN {
            return Err(ContainerNumberError::InvalidFormat {
                len: normalized.len(),
            });
        }
        classify(&normalized)?;

        let expected = weighted_check_digit(&normalized[..CHECK_DIGIT_PREFIX_LEN]);
        let found = digit_value(normalized[CHECK_DIGIT_PREFIX_LEN]);
        if expected != found {
            return Err(ContainerNumberError::CheckDigitMismatch { expected, found });
        }

        Ok(Self(normalized.into_iter().collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The four-letter owner code, e.g. `EFGH`.
    pub fn owner_code(&self) -> &str {
        &self.0[..OWNER_CODE_LEN]
    }

    /// The six-digit serial number.
    pub fn serial(&self) -> &str {
        &self.0[OWNER_CODE_LEN..CHECK_DIGIT_PREFIX_LEN]
    }

    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[CHECK_DIGIT_PREFIX_LEN] - b'0'
    }
}

/// Compute the check digit for the first ten characters of a container number.
///
/// The prefix is normalized the same way as [`ContainerNumber::parse`], so
/// `"abcd 000000"` is accepted.
pub fn check_digit(prefix: &str) -> Result<u8, ContainerNumberError> {
    let normalized = normalize(prefix);
    if normalized.len() != CHECK_DIGIT_PREFIX_LEN {
        return Err(ContainerNumberError::InvalidFormat {
            len: normalized.len(),
        });
    }
    classify(&normalized)?;

    Ok(weighted_check_digit(&normalized))
}

/// Drop whitespace anywhere and uppercase.
fn normalize(raw: &str) -> Vec<char> {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Letters in the owner code, digits everywhere after it. Reports the first
/// offending position.
fn classify(chars: &[char]) -> Result<(), ContainerNumberError> {
    for (position, &c) in chars.iter().enumerate() {
        let valid = if position < OWNER_CODE_LEN {
            c.is_ascii_uppercase()
        } else {
            c.is_ascii_digit()
        };
        if !valid {
            return Err(ContainerNumberError::InvalidCharacter { position, found: c });
        }
    }
    Ok(())
}

/// Letters A..Z map to 10..35, digits to their face value; position `i` is
/// weighted by `2^i`. The sum mod 11 is the check digit, with 10 folded to 0.
/// Callers guarantee the slice holds ten already-classified characters.
fn weighted_check_digit(prefix: &[char]) -> u8 {
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, &c)| char_value(c) << i)
        .sum();

    match (sum % 11) as u8 {
        10 => 0,
        digit => digit,
    }
}

fn char_value(c: char) -> u32 {
    if c.is_ascii_uppercase() {
        u32::from(c as u8 - b'A') + 10
    } else {
        u32::from(digit_value(c))
    }
}

fn digit_value(c: char) -> u8 {
    c as u8 - b'0'
}

impl FromStr for ContainerNumber {
    type Err = ContainerNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContainerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ContainerNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContainerNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContainerNumber::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_sums_letters_only() {
        // A,B,C,D = 10,11,12,13 weighted 1,2,4,8: 10 + 22 + 48 + 104 = 184, 184 mod 11 = 8
        assert_eq!(check_digit("ABCD000000").unwrap(), 8);
        assert_eq!(
            ContainerNumber::parse("ABCD0000001").unwrap_err(),
            ContainerNumberError::CheckDigitMismatch {
                expected: 8,
                found: 1
            }
        );
        assert!(ContainerNumber::parse("ABCD0000008").is_ok());
    }

    #[test]
    fn remainder_ten_maps_to_zero() {
        // AAAA000010: 10 * (1 + 2 + 4 + 8) + 1 * 256 = 406, 406 mod 11 = 10
        assert_eq!(check_digit("AAAA000010").unwrap(), 0);
        assert!(ContainerNumber::parse("AAAA0000100").is_ok());
    }

    #[test]
    fn parse_and_check_digit_report_the_same_bad_character() {
        let expected = ContainerNumberError::InvalidCharacter {
            position: 2,
            found: '7',
        };
        assert_eq!(ContainerNumber::parse("AB7D0000008").unwrap_err(), expected);
        assert_eq!(check_digit("AB7D000000").unwrap_err(), expected);
        assert_eq!(
            check_digit("ABCD00X000").unwrap_err(),
            ContainerNumberError::InvalidCharacter {
                position: 6,
                found: 'X'
            }
        );
    }

    #[test]
    fn accessors_split_the_number() {
        let number = ContainerNumber::parse("efgh 000000 2").unwrap();
        assert_eq!(number.as_str(), "EFGH0000002");
        assert_eq!(number.owner_code(), "EFGH");
        assert_eq!(number.serial(), "000000");
        assert_eq!(number.check_digit(), 2);
    }

    #[test]
    fn deserialize_rejects_invalid_numbers() {
        let ok: ContainerNumber = serde_json::from_str("\"EFGH0000002\"").unwrap();
        assert_eq!(ok.as_str(), "EFGH0000002");
        assert!(serde_json::from_str::<ContainerNumber>("\"EFGH0000003\"").is_err());
    }
}
