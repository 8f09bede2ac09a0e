//! Sortable unique identifiers.
//!
//! A [`Ulid`] is a 26-character string over an unambiguous alphabet. The
//! first 10 characters encode a microsecond timestamp (most-significant
//! digit first), the remaining 16 are cryptographically random, so
//! lexicographic order approximates creation order.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed characters. Excludes 0, O, I, L and U to avoid transcription
/// mistakes.
const ALPHABET: &[u8] = b"123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Total identifier length.
const ULID_LENGTH: usize = 26;

/// Characters used for the timestamp prefix.
const TIMESTAMP_LENGTH: usize = 10;

/// Errors raised when parsing an identifier from an arbitrary string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UlidError {
    /// The value does not have the expected number of characters.
    #[error("identifier must be exactly {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The value contains a character outside the allowed alphabet.
    #[error("identifier contains disallowed character {0:?}")]
    InvalidCharacter(char),
}

/// Unique identifier for aggregates and domain events.
///
/// Two identifiers are equal iff their string values are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ulid(String);

impl Ulid {
    /// Generates a fresh identifier from the current time.
    pub fn random() -> Self {
        Self::from_timestamp_micros(Utc::now().timestamp_micros().max(0) as u64)
    }

    /// Generates an identifier whose prefix encodes the given microsecond
    /// timestamp, with a fresh random suffix.
    ///
    /// The fixed-width prefix holds at most `alphabet_len^10` values;
    /// larger timestamps wrap, keeping `micros` modulo that capacity.
    pub fn from_timestamp_micros(micros: u64) -> Self {
        let base = ALPHABET.len() as u64;
        let mut buf = [0u8; ULID_LENGTH];

        let mut ts = micros;
        for slot in buf[..TIMESTAMP_LENGTH].iter_mut().rev() {
            *slot = ALPHABET[(ts % base) as usize];
            ts /= base;
        }

        for slot in buf[TIMESTAMP_LENGTH..].iter_mut() {
            *slot = ALPHABET[rand::random_range(0..ALPHABET.len())];
        }

        // buf holds only ASCII characters from the alphabet
        Self(buf.iter().map(|&b| b as char).collect())
    }

    /// Validates and wraps an arbitrary string.
    pub fn new(value: impl Into<String>) -> Result<Self, UlidError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Returns true if the string is a well-formed identifier.
    pub fn is_valid(value: &str) -> bool {
        Self::validate(value).is_ok()
    }

    /// Validity check with a caller-chosen expected length, for identifier
    /// value objects that deviate from the default.
    pub fn is_valid_with_length(value: &str, expected: usize) -> bool {
        Self::validate_with_length(value, expected).is_ok()
    }

    /// Returns the underlying string.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Decodes the microsecond timestamp encoded in the prefix, i.e. the
    /// original timestamp modulo the prefix capacity of `alphabet_len^10`.
    pub fn timestamp_micros(&self) -> u64 {
        let base = ALPHABET.len() as u64;
        self.0.bytes().take(TIMESTAMP_LENGTH).fold(0, |acc, b| {
            let digit = ALPHABET.iter().position(|&a| a == b).unwrap_or(0) as u64;
            acc * base + digit
        })
    }

    fn validate(value: &str) -> Result<(), UlidError> {
        Self::validate_with_length(value, ULID_LENGTH)
    }

    fn validate_with_length(value: &str, expected: usize) -> Result<(), UlidError> {
        if value.len() != expected {
            return Err(UlidError::InvalidLength {
                expected,
                actual: value.chars().count(),
            });
        }

        match value.chars().find(|&c| !ALPHABET.contains(&(c as u8))) {
            Some(c) => Err(UlidError::InvalidCharacter(c)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ulid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ulid {
    type Err = UlidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ulid {
    type Error = UlidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ulid> for String {
    fn from(id: Ulid) -> Self {
        id.0
    }
}
