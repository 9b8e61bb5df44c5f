//! Driven ports for the third-party identity provider.
//!
//! The provider SDK is an opaque capability: it is initialised once per page
//! session and hands back a session handle that can report authentication
//! state, mint access tokens, and start or finish redirect-based logins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AccessToken, UserProfile};

/// Settings passed to the identity provider on initialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Tenant domain, e.g. `example.eu.auth0.com`.
    pub domain: String,
    /// Public client identifier.
    pub client_id: String,
    /// API audience tokens are minted for.
    pub audience: Option<String>,
    /// Where the provider sends the browser after login.
    pub redirect_uri: String,
    /// Whether to request refresh tokens.
    pub use_refresh_tokens: bool,
}

define_port_error! {
    /// Errors surfaced by the identity provider.
    pub enum IdentityError {
        /// The provider could not be initialised.
        Initialization { message: String } =>
            "identity provider initialisation failed: {message}",
        /// Completing a redirect-based login failed.
        Redirect { message: String } =>
            "identity redirect callback failed: {message}",
        /// A session call (token, profile, logout) failed.
        Session { message: String } =>
            "identity session request failed: {message}",
        /// The operation needs an authenticated session.
        LoginRequired => "login required",
    }
}

/// Live session handle returned by [`IdentityProvider::initialize`].
#[async_trait]
pub trait IdentitySession: Send + Sync {
    /// Whether the session holds an authenticated user.
    async fn is_authenticated(&self) -> Result<bool, IdentityError>;

    /// Profile of the authenticated user, if any.
    async fn user(&self) -> Result<Option<UserProfile>, IdentityError>;

    /// Access token for API calls.
    async fn access_token(&self) -> Result<AccessToken, IdentityError>;

    /// Start a redirect-based login.
    async fn login_with_redirect(&self) -> Result<(), IdentityError>;

    /// End the session.
    async fn logout(&self) -> Result<(), IdentityError>;

    /// Finish a redirect-based login using the callback query string.
    async fn handle_redirect_callback(&self, query: &str) -> Result<(), IdentityError>;
}

/// Port for initialising the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create the page-session handle.
    async fn initialize(
        &self,
        config: &IdentityConfig,
    ) -> Result<Arc<dyn IdentitySession>, IdentityError>;
}

/// In-memory session used by fixtures and tests.
#[derive(Debug)]
pub struct FixtureIdentitySession {
    profile: Option<UserProfile>,
    token: Option<AccessToken>,
    authenticated: AtomicBool,
    callbacks: Mutex<Vec<String>>,
}

impl FixtureIdentitySession {
    /// Session for a signed-in user.
    pub fn signed_in(profile: UserProfile, token: AccessToken) -> Self {
        Self {
            profile: Some(profile),
            token: Some(token),
            authenticated: AtomicBool::new(true),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Session with nobody signed in.
    pub fn anonymous() -> Self {
        Self {
            profile: None,
            token: None,
            authenticated: AtomicBool::new(false),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Redirect callback queries handled so far.
    pub fn handled_callbacks(&self) -> Vec<String> {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IdentitySession for FixtureIdentitySession {
    async fn is_authenticated(&self) -> Result<bool, IdentityError> {
        Ok(self.authenticated.load(Ordering::SeqCst))
    }

    async fn user(&self) -> Result<Option<UserProfile>, IdentityError> {
        if self.authenticated.load(Ordering::SeqCst) {
            Ok(self.profile.clone())
        } else {
            Ok(None)
        }
    }

    async fn access_token(&self) -> Result<AccessToken, IdentityError> {
        match (&self.token, self.authenticated.load(Ordering::SeqCst)) {
            (Some(token), true) => Ok(token.clone()),
            _ => Err(IdentityError::login_required()),
        }
    }

    async fn login_with_redirect(&self) -> Result<(), IdentityError> {
        if self.profile.is_none() {
            return Err(IdentityError::session("fixture has no user to sign in"));
        }
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        self.authenticated.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn handle_redirect_callback(&self, query: &str) -> Result<(), IdentityError> {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_owned());
        Ok(())
    }
}

/// Provider that always hands out the same fixture session.
#[derive(Debug, Clone)]
pub struct FixtureIdentityProvider {
    session: Arc<FixtureIdentitySession>,
}

impl FixtureIdentityProvider {
    /// Wrap a fixture session.
    pub fn new(session: Arc<FixtureIdentitySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn initialize(
        &self,
        _config: &IdentityConfig,
    ) -> Result<Arc<dyn IdentitySession>, IdentityError> {
        let session: Arc<dyn IdentitySession> = self.session.clone();
        Ok(session)
    }
}
