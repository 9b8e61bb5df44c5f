//! Identifier newtypes for cached entities.
//!
//! Numeric identifiers are assigned by the API; `0` never names a real row and
//! is treated as blank. User identifiers are opaque strings assigned by the
//! identity provider (for example `auth0|5f1c...`).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw numeric value.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Whether the identifier is the blank sentinel `0`.
            pub const fn is_blank(self) -> bool {
                self.0 == 0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id! {
    /// Server-assigned question identifier.
    QuestionId
}

numeric_id! {
    /// Server-assigned answer identifier.
    AnswerId
}

/// Identity-provider user identifier.
///
/// # Examples
/// ```
/// use frontend::domain::UserId;
///
/// assert!(UserId::new("  ").is_blank());
/// assert_eq!(UserId::new("auth0|42").as_ref(), "auth0|42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a provider-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Whether the identifier is empty once trimmed.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identifier blank handling.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true)]
    #[case(1, false)]
    #[case(u64::MAX, false)]
    fn numeric_blank_is_zero(#[case] raw: u64, #[case] blank: bool) {
        assert_eq!(QuestionId::new(raw).is_blank(), blank);
        assert_eq!(AnswerId::new(raw).is_blank(), blank);
    }

    #[rstest]
    #[case("", true)]
    #[case(" \t", true)]
    #[case("google-oauth2|1", false)]
    fn user_blank_is_whitespace(#[case] raw: &str, #[case] blank: bool) {
        assert_eq!(UserId::new(raw).is_blank(), blank);
    }

    #[test]
    fn ids_serialise_transparently() {
        let json = serde_json::to_string(&(QuestionId::new(7), UserId::new("u")))
            .expect("serialise ids");
        assert_eq!(json, "[7,\"u\"]");
    }
}
