//! Auth-session store.
//!
//! Holds the identity-provider session for the lifetime of the page session.
//! The slice starts loading and settles exactly once, either authenticated
//! (or anonymous) or failed. Login and logout are calls on the session handle,
//! not events.

use std::sync::Arc;

use super::event::{AuthEvent, Event, SessionHandle};
use super::reducer::{Reducer, update};
use crate::domain::{AccessToken, SyncError, UserId};

/// Identity-provider session state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    /// Provider initialisation has not settled yet.
    pub is_loading: bool,
    /// Last failure, if any.
    pub error: Option<SyncError>,
    /// Provider session handle once initialised.
    pub session: Option<SessionHandle>,
    /// Whether a user is signed in.
    pub is_authenticated: bool,
    /// Token for authenticated API calls.
    pub access_token: Option<AccessToken>,
    /// Signed-in user.
    pub current_user: Option<UserId>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            is_loading: true,
            error: None,
            session: None,
            is_authenticated: false,
            access_token: None,
            current_user: None,
        }
    }
}

impl Reducer for AuthState {
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self> {
        match event {
            Event::Auth(AuthEvent::InitRequested) => update(state, |s| s.is_loading = true),
            Event::Auth(AuthEvent::Initialized { session }) => update(state, |s| {
                s.is_loading = false;
                s.session = Some(session.handle.clone());
                s.is_authenticated = session.is_authenticated;
                s.access_token.clone_from(&session.access_token);
                s.current_user.clone_from(&session.current_user);
            }),
            Event::Auth(AuthEvent::InitFailed { error }) => update(state, |s| {
                s.is_loading = false;
                s.error = Some(error.clone());
            }),
            _ => Arc::clone(state),
        }
    }
}
