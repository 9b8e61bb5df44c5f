//! Bearer access token issued by the identity provider.

use std::fmt;

use zeroize::Zeroizing;

/// Access token attached to authenticated API calls.
///
/// The token text is wiped from memory when the last copy is dropped and is
/// never printed by `Debug`.
///
/// # Examples
/// ```
/// use frontend::domain::AccessToken;
///
/// let token = AccessToken::new("abc");
/// assert_eq!(token.bearer(), "Bearer abc");
/// assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
/// ```
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Raw token text.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
