//! Mail user (address with optional display name).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_LENGTH: usize = 64;
const MAX_LABEL_LENGTH: usize = 63;

/// E-mail address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMailUser")]
pub struct MailUser {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RawMailUser {
    email: String,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<RawMailUser> for MailUser {
    type Error = ValidationError;

    fn try_from(raw: RawMailUser) -> Result<Self, Self::Error> {
        match raw.name {
            Some(name) => Self::with_name(raw.email, name),
            None => Self::new(raw.email),
        }
    }
}

impl MailUser {
    /// Creates a user with just an address.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self { email, name: None })
    }

    /// Creates a user with address and display name. A blank name is dropped.
    pub fn with_name(
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut user = Self::new(email)?;
        let name = name.into();
        if !name.trim().is_empty() {
            user.name = Some(name);
        }
        Ok(user)
    }

    /// Parses `"Name <email>"` or a bare address.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();

        if let (Some(start), Some(end)) = (s.find('<'), s.rfind('>')) {
            if start < end {
                let name = s[..start].trim().trim_matches('"');
                let email = s[start + 1..end].trim();
                return Self::with_name(email, name);
            }
        }

        Self::new(s)
    }

    /// The address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for MailUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

impl TryFrom<&str> for MailUser {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MailUser {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl TryFrom<(&str, &str)> for MailUser {
    type Error = ValidationError;

    /// `(email, name)`.
    fn try_from((email, name): (&str, &str)) -> Result<Self, Self::Error> {
        Self::with_name(email, name)
    }
}

fn invalid(email: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidEmail {
        email: email.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks the dot-atom form of RFC 5322 `addr-spec`.
fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(invalid(email, "address cannot be empty"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(invalid(email, "address too long (max 254 characters)"));
    }

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return Err(invalid(email, "address must contain exactly one @")),
    };

    if local.is_empty() || local.len() > MAX_LOCAL_LENGTH {
        return Err(invalid(email, "local part must be 1-64 characters"));
    }

    if !is_dot_atom(local, is_atext) {
        return Err(invalid(email, "local part contains invalid characters"));
    }

    if domain.is_empty() {
        return Err(invalid(email, "domain cannot be empty"));
    }

    let labels_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return Err(invalid(email, "domain is not a valid host name"));
    }

    Ok(())
}

fn is_dot_atom(s: &str, allowed: fn(char) -> bool) -> bool {
    s.split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(allowed))
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c) || (!c.is_ascii() && !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        for email in [
            "a@x.com",
            "first.last@example.co.uk",
            "user+tag@sub.example.org",
            "o'brien@example.ie",
            "admin@localhost",
        ] {
            assert!(MailUser::new(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "a@b@c.com",
            "user..name@example.com",
            ".user@example.com",
            "user.@example.com",
            "user name@example.com",
            "user@-example.com",
            "user@example..com",
            "user@exa mple.com",
        ] {
            assert!(
                matches!(MailUser::new(email), Err(ValidationError::InvalidEmail { .. })),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_length_limits() {
        let local = "a".repeat(65);
        assert!(MailUser::new(format!("{local}@example.com")).is_err());

        let long_domain = format!("{}.com", "a".repeat(250));
        assert!(MailUser::new(format!("a@{long_domain}")).is_err());
    }

    #[test]
    fn test_with_name() {
        let user = MailUser::with_name("a@x.com", "Alice").unwrap();
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.name(), Some("Alice"));
        assert_eq!(user.to_string(), "Alice <a@x.com>");

        let blank = MailUser::with_name("a@x.com", "  ").unwrap();
        assert_eq!(blank.name(), None);
    }

    #[test]
    fn test_parse_display_form() {
        let user = MailUser::parse("\"Bob Smith\" <bob@example.com>").unwrap();
        assert_eq!(user.email(), "bob@example.com");
        assert_eq!(user.name(), Some("Bob Smith"));

        let bare: MailUser = "carol@example.com".try_into().unwrap();
        assert_eq!(bare.name(), None);

        let pair: MailUser = ("dave@example.com", "Dave").try_into().unwrap();
        assert_eq!(pair.name(), Some("Dave"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let user = MailUser::with_name("a@x.com", "A").unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@x.com", "name": "A"}));
        let back: MailUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);

        let anonymous = MailUser::new("b@x.com").unwrap();
        let json = serde_json::to_value(&anonymous).unwrap();
        assert_eq!(json, serde_json::json!({"email": "b@x.com"}));
        let back: MailUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, anonymous);
    }

    #[test]
    fn test_deserialization_validates() {
        let result: Result<MailUser, _> = serde_json::from_str(r#"{"email":"nope"}"#);
        assert!(result.is_err());
    }
}
