//! Identity provider backed by a pre-issued bearer token.
//!
//! Headless clients cannot complete a browser redirect, so this adapter
//! treats a configured token as an already-completed login. Redirect logins
//! are refused; logout only forgets the token for the rest of the session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientSettings;
use crate::domain::ports::{IdentityConfig, IdentityError, IdentityProvider, IdentitySession};
use crate::domain::{AccessToken, UserId, UserProfile};

/// Provider handing out sessions for a configured token.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<AccessToken>,
    user_id: Option<UserId>,
}

impl StaticTokenProvider {
    /// Provider for `token`, issued to `user_id` when known.
    pub fn new(token: Option<AccessToken>, user_id: Option<UserId>) -> Self {
        Self { token, user_id }
    }

    /// Provider for the token configured in `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.access_token(), settings.user_id())
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn initialize(
        &self,
        config: &IdentityConfig,
    ) -> Result<Arc<dyn IdentitySession>, IdentityError> {
        debug!(
            domain = config.domain.as_str(),
            has_token = self.token.is_some(),
            "initialising static token session"
        );
        let session: Arc<dyn IdentitySession> = Arc::new(StaticTokenSession {
            token: self.token.clone(),
            user_id: self.user_id.clone(),
            signed_in: AtomicBool::new(self.token.is_some()),
        });
        Ok(session)
    }
}

struct StaticTokenSession {
    token: Option<AccessToken>,
    user_id: Option<UserId>,
    signed_in: AtomicBool,
}

impl StaticTokenSession {
    fn active_token(&self) -> Option<&AccessToken> {
        self.token
            .as_ref()
            .filter(|_| self.signed_in.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl IdentitySession for StaticTokenSession {
    async fn is_authenticated(&self) -> Result<bool, IdentityError> {
        Ok(self.active_token().is_some())
    }

    async fn user(&self) -> Result<Option<UserProfile>, IdentityError> {
        if self.active_token().is_none() {
            return Ok(None);
        }
        Ok(self.user_id.as_ref().map(|id| UserProfile {
            user_id: id.clone(),
            name: id.to_string(),
            picture: None,
            user_metadata: None,
        }))
    }

    async fn access_token(&self) -> Result<AccessToken, IdentityError> {
        self.active_token()
            .cloned()
            .ok_or_else(IdentityError::login_required)
    }

    async fn login_with_redirect(&self) -> Result<(), IdentityError> {
        Err(IdentityError::session(
            "redirect login needs a browser; configure an access token instead",
        ))
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        self.signed_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn handle_redirect_callback(&self, _query: &str) -> Result<(), IdentityError> {
        Err(IdentityError::redirect(
            "static token sessions do not receive redirect callbacks",
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for static token sessions.
    use super::*;

    fn config() -> IdentityConfig {
        IdentityConfig {
            domain: String::new(),
            client_id: String::new(),
            audience: None,
            redirect_uri: "http://localhost:3000".to_owned(),
            use_refresh_tokens: true,
        }
    }

    #[tokio::test]
    async fn configured_token_is_an_authenticated_session() {
        let provider = StaticTokenProvider::new(
            Some(AccessToken::new("tok")),
            Some(UserId::new("auth0|1")),
        );
        let session = provider.initialize(&config()).await.expect("initialise");

        assert_eq!(session.is_authenticated().await, Ok(true));
        assert_eq!(session.access_token().await, Ok(AccessToken::new("tok")));
        let user = session.user().await.expect("user").expect("signed in");
        assert_eq!(user.user_id, UserId::new("auth0|1"));
    }

    #[tokio::test]
    async fn missing_token_is_anonymous() {
        let session = StaticTokenProvider::default()
            .initialize(&config())
            .await
            .expect("initialise");

        assert_eq!(session.is_authenticated().await, Ok(false));
        assert_eq!(session.access_token().await, Err(IdentityError::LoginRequired));
        assert!(session.login_with_redirect().await.is_err());
    }

    #[tokio::test]
    async fn logout_forgets_the_token() {
        let session = StaticTokenProvider::new(Some(AccessToken::new("tok")), None)
            .initialize(&config())
            .await
            .expect("initialise");

        session.logout().await.expect("logout");

        assert_eq!(session.is_authenticated().await, Ok(false));
        assert_eq!(session.user().await, Ok(None));
    }
}
