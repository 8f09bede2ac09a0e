//! Self-validating value objects.
//!
//! Each wrapper validates at construction and is immutable afterwards;
//! reads never re-validate. Construction failures surface immediately as
//! [`ValidationError`], never silently corrected.

use std::fmt;

use common::Ulid;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 20;
const NAME_MIN_LENGTH: usize = 3;
const NAME_MAX_LENGTH: usize = 100;

/// Shape check shared by [`EmailAddress`] and the email message recipients.
pub(crate) fn is_well_formed_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and wraps an address.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !is_well_formed_email(&value) {
            return Err(ValidationError::InvalidEmail { value });
        }
        Ok(Self(value))
    }

    /// Returns the address as a string slice.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A plain-text password candidate that passed the strength rules:
/// 8 to 20 characters, at least one uppercase letter, one digit and one
/// non-alphanumeric symbol.
///
/// Never stored; only [`PasswordHash`] is persisted. Debug output is
/// redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validates and wraps a plain-text password.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        let length_ok =
            value.len() >= PASSWORD_MIN_LENGTH && value.len() <= PASSWORD_MAX_LENGTH;
        let has_uppercase = value.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = value.chars().any(|c| c.is_ascii_digit());
        let has_symbol = value.chars().any(|c| !c.is_alphanumeric());

        if !(length_ok && has_uppercase && has_digit && has_symbol) {
            return Err(ValidationError::InvalidPassword {
                min: PASSWORD_MIN_LENGTH,
                max: PASSWORD_MAX_LENGTH,
            });
        }
        Ok(Self(value))
    }

    /// Returns the plain-text value.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// An opaque password hash. Passthrough wrapper: the hash itself is not
/// re-validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an already computed hash, e.g. one loaded from storage.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Hashes a validated plain-text password (SHA-256, hex-encoded).
    pub fn from_password(password: &Password) -> Self {
        let digest = Sha256::digest(password.value().as_bytes());
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Returns true if the candidate hashes to this value.
    pub fn verify(&self, candidate: &Password) -> bool {
        Self::from_password(candidate) == *self
    }

    /// Returns the hash as a string slice.
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// A user's display name, 3 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Validates and wraps a name.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.len() < NAME_MIN_LENGTH || value.len() > NAME_MAX_LENGTH {
            return Err(ValidationError::InvalidName {
                min: NAME_MIN_LENGTH,
                max: NAME_MAX_LENGTH,
            });
        }
        Ok(Self(value))
    }

    /// Returns the name as a string slice.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a user aggregate. Delegates validity to [`Ulid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Ulid);

impl UserId {
    /// Generates a fresh identifier.
    pub fn random() -> Self {
        Self(Ulid::random())
    }

    /// Validates and wraps an identifier string.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        Ok(Self(Ulid::new(value)?))
    }

    /// Returns the underlying identifier.
    pub fn as_ulid(&self) -> &Ulid {
        &self.0
    }

    /// Returns the identifier as a string slice.
    pub fn value(&self) -> &str {
        self.0.value()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Ulid> for UserId {
    fn from(id: Ulid) -> Self {
        Self(id)
    }
}

/// Whether the user confirmed their email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailVerified(bool);

impl EmailVerified {
    pub fn verified() -> Self {
        Self(true)
    }

    pub fn not_verified() -> Self {
        Self(false)
    }

    pub fn value(&self) -> bool {
        self.0
    }
}

/// Soft-deletion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deleted(bool);

impl Deleted {
    pub fn deleted() -> Self {
        Self(true)
    }

    pub fn not_deleted() -> Self {
        Self(false)
    }

    pub fn value(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        for addr in ["a@example.com", "first.last@sub.example.org", "x+tag@d.io"] {
            assert!(EmailAddress::new(addr).is_ok(), "{addr} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for addr in [
            "",
            "plain",
            "@example.com",
            "a@",
            "a@nodot",
            "a b@example.com",
            "a@@example.com",
            "a@.example.com",
            "a@example.com.",
        ] {
            assert!(EmailAddress::new(addr).is_err(), "{addr:?} should be invalid");
        }
    }

    #[test]
    fn password_accepts_all_rules_met() {
        assert!(Password::new("Abcdef1!").is_ok());
        assert!(Password::new("Xy9#longerpass").is_ok());
    }

    #[test]
    fn password_length_boundaries() {
        // 7 chars: too short even with all character classes
        assert!(Password::new("Abcd1!x").is_err());
        // 8 chars: minimum
        assert!(Password::new("Abcde1!x").is_ok());
        // 20 chars: maximum
        assert!(Password::new("A1!aaaaaaaaaaaaaaaaa").is_ok());
        // 21 chars: too long
        assert!(Password::new("A1!aaaaaaaaaaaaaaaaaa").is_err());
    }

    #[test]
    fn password_requires_each_character_class() {
        // no uppercase
        assert!(Password::new("abcdef1!").is_err());
        // no digit
        assert!(Password::new("Abcdefg!").is_err());
        // no symbol
        assert!(Password::new("Abcdefg1").is_err());
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("Abcdef1!").unwrap();
        assert_eq!(format!("{password:?}"), "Password(<redacted>)");
    }

    #[test]
    fn hash_verifies_original_and_rejects_others() {
        let password = Password::new("Abcdef1!").unwrap();
        let hash = PasswordHash::from_password(&password);
        assert!(hash.verify(&password));

        let other = Password::new("Zyxwvu9?").unwrap();
        assert!(!hash.verify(&other));
    }

    #[test]
    fn hash_is_hex_encoded_sha256() {
        let password = Password::new("Abcdef1!").unwrap();
        let hash = PasswordHash::from_password(&password);
        assert_eq!(hash.value().len(), 64);
        assert!(hash.value().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn name_length_boundaries() {
        assert!(UserName::new("ab").is_err());
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new("a".repeat(100)).is_ok());
        assert!(UserName::new("a".repeat(101)).is_err());
    }

    #[test]
    fn user_id_delegates_to_ulid_validation() {
        let id = UserId::random();
        assert!(UserId::new(id.value()).is_ok());
        assert!(UserId::new("too-short").is_err());
    }

    #[test]
    fn boolean_value_objects() {
        assert!(EmailVerified::verified().value());
        assert!(!EmailVerified::not_verified().value());
        assert!(Deleted::deleted().value());
        assert!(!Deleted::not_deleted().value());
    }
}
