//! Identity-provider session creators.
//!
//! Initialisation is the only auth operation that flows through the store.
//! Login and logout act on the session handle directly.

use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::domain::ports::{IdentityConfig, IdentityError, IdentityProvider};
use crate::domain::{SyncError, UserProfile};
use crate::state::{AuthEvent, AuthSession, AuthState, Dispatched, SessionHandle, Thunk};

/// Whether `query` carries a redirect-login callback.
///
/// Both `code` and `state` must be present. A leading `?` is ignored.
///
/// # Examples
/// ```
/// use frontend::state::creators::is_redirect_callback;
///
/// assert!(is_redirect_callback("?code=abc&state=xyz"));
/// assert!(!is_redirect_callback("?code=abc"));
/// ```
pub fn is_redirect_callback(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    let (mut code, mut state) = (false, false);
    for (key, _) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = true,
            "state" => state = true,
            _ => {}
        }
    }
    code && state
}

/// Initialise the identity provider once for the page session.
///
/// Completes a pending redirect login when `redirect_query` carries one, then
/// records the session. The signed-in user's profile is reduced into the users
/// store before the session settles.
pub fn init_auth(
    provider: Arc<dyn IdentityProvider>,
    config: IdentityConfig,
    redirect_query: Option<String>,
) -> Thunk {
    Thunk::new(move |store| {
        async move {
            store.dispatch(AuthEvent::InitRequested).await;
            match initialise(provider.as_ref(), &config, redirect_query.as_deref()).await {
                Ok((session, profile)) => {
                    debug!(
                        authenticated = session.is_authenticated,
                        "identity provider initialised"
                    );
                    if let Some(profile) = profile {
                        store.dispatch(AuthEvent::LoginReceived { profile }).await;
                    }
                    store.dispatch(AuthEvent::Initialized { session }).await;
                    Dispatched::Succeeded
                }
                Err(err) => {
                    warn!(
                        kind = err.kind(),
                        error = %err,
                        "identity provider initialisation failed"
                    );
                    let error = SyncError::identity(err.to_string());
                    store
                        .dispatch(AuthEvent::InitFailed {
                            error: error.clone(),
                        })
                        .await;
                    Dispatched::Failed { error }
                }
            }
        }
        .boxed()
    })
}

async fn initialise(
    provider: &dyn IdentityProvider,
    config: &IdentityConfig,
    redirect_query: Option<&str>,
) -> Result<(AuthSession, Option<UserProfile>), IdentityError> {
    let session = provider.initialize(config).await?;
    if let Some(query) = redirect_query.filter(|query| is_redirect_callback(query)) {
        session.handle_redirect_callback(query).await?;
    }
    let is_authenticated = session.is_authenticated().await?;
    let (profile, access_token) = if is_authenticated {
        (session.user().await?, Some(session.access_token().await?))
    } else {
        (None, None)
    };
    let current_user = profile.as_ref().map(|profile| profile.user_id.clone());
    Ok((
        AuthSession {
            handle: SessionHandle::new(session),
            is_authenticated,
            access_token,
            current_user,
        },
        profile,
    ))
}

fn session_of(auth: &AuthState) -> Result<&SessionHandle, SyncError> {
    auth.session
        .as_ref()
        .ok_or_else(|| SyncError::identity("identity provider is not initialised"))
}

/// Start a redirect-based login on the initialised session.
///
/// # Errors
///
/// Returns an identity error when the provider has not been initialised or
/// refuses to start the login.
pub async fn login(auth: &AuthState) -> Result<(), SyncError> {
    session_of(auth)?
        .session()
        .login_with_redirect()
        .await
        .map_err(|err| SyncError::identity(err.to_string()))
}

/// End the provider session.
///
/// # Errors
///
/// Returns an identity error when the provider has not been initialised or
/// the logout call fails.
pub async fn logout(auth: &AuthState) -> Result<(), SyncError> {
    session_of(auth)?
        .session()
        .logout()
        .await
        .map_err(|err| SyncError::identity(err.to_string()))
}
