//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ports::IdentityConfig;
use crate::domain::{AccessToken, UserId};

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000";

/// Settings for the API transport and the identity provider.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QA_CLIENT")]
pub struct ClientSettings {
    /// Origin the `/api` paths are resolved against.
    pub api_base_url: Option<String>,
    /// Transport timeout in seconds; unset leaves the transport default.
    pub request_timeout_secs: Option<u64>,
    /// Identity-provider tenant domain.
    pub domain: Option<String>,
    /// Identity-provider client id.
    pub client_id: Option<String>,
    /// API audience for minted tokens.
    pub audience: Option<String>,
    /// Where the provider redirects after login.
    pub redirect_uri: Option<String>,
    /// Opt out of refresh tokens.
    #[ortho_config(default = false)]
    pub disable_refresh_tokens: bool,
    /// Pre-issued bearer token for headless use.
    pub access_token: Option<String>,
    /// User the pre-issued token belongs to.
    pub user_id: Option<String>,
}

impl ClientSettings {
    /// Return the configured API origin, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not an absolute URL.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// Return the transport timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Return the identity-provider settings.
    pub fn identity(&self) -> IdentityConfig {
        IdentityConfig {
            domain: self.domain.clone().unwrap_or_default(),
            client_id: self.client_id.clone().unwrap_or_default(),
            audience: self.audience.clone(),
            redirect_uri: self
                .redirect_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_owned()),
            use_refresh_tokens: !self.disable_refresh_tokens,
        }
    }

    /// Return the pre-issued token, ignoring blank values.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
    }

    /// Return the user the pre-issued token belongs to, ignoring blank values.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
            .as_deref()
            .map(UserId::new)
            .filter(|id| !id.is_blank())
    }
}
