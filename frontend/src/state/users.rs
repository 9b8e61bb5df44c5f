//! Users store: public profiles keyed by provider id.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

use super::event::{AuthEvent, Event, UsersEvent};
use super::reducer::{Reducer, update};
use crate::domain::{SyncError, UserId, UserProfile};

/// Cached profiles and request flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersState {
    /// A profile fetch is in flight.
    pub is_fetching: bool,
    /// Last failure, if any.
    pub error: Option<SyncError>,
    /// When the last fetch succeeded.
    pub last_updated: Option<DateTime<Utc>>,
    /// Cached profiles by user id.
    pub entities: IndexMap<UserId, UserProfile>,
    /// Profiles with a fetch in flight.
    pub in_flight: IndexSet<UserId>,
}

impl UsersState {
    /// Cached profile, if present.
    pub fn get(&self, id: &UserId) -> Option<&UserProfile> {
        self.entities.get(id)
    }

    /// Whether a fetch for `id` has been issued and not yet settled.
    pub fn is_in_flight(&self, id: &UserId) -> bool {
        self.in_flight.contains(id)
    }
}

impl Reducer for UsersState {
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self> {
        match event {
            Event::Users(UsersEvent::FetchRequested { id }) => update(state, |s| {
                s.in_flight.insert(id.clone());
                s.is_fetching = true;
            }),
            Event::Users(UsersEvent::Fetched {
                id,
                user,
                received_at,
            }) => update(state, |s| {
                s.in_flight.shift_remove(id);
                s.entities.insert(user.user_id.clone(), user.clone());
                s.is_fetching = false;
                s.last_updated = Some(*received_at);
            }),
            Event::Users(UsersEvent::FetchFailed { id, error }) => update(state, |s| {
                s.in_flight.shift_remove(id);
                s.is_fetching = false;
                s.error = Some(error.clone());
            }),
            Event::Auth(AuthEvent::LoginReceived { profile }) => update(state, |s| {
                s.entities.insert(profile.user_id.clone(), profile.clone());
            }),
            _ => Arc::clone(state),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the users store.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn profile(id: &str) -> UserProfile {
        UserProfile {
            user_id: UserId::new(id),
            name: format!("{id}@example.com"),
            picture: Some(format!("https://img.example/{id}.png")),
            user_metadata: None,
        }
    }

    #[rstest]
    fn unrelated_auth_events_return_the_same_slice() {
        let state = Arc::new(UsersState::default());
        let next = UsersState::reduce(&state, &AuthEvent::InitRequested.into());
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[rstest]
    fn fetched_profile_is_keyed_by_user_id() {
        let at = Utc
            .with_ymd_and_hms(2026, 10, 18, 8, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        let requested = UsersState::reduce(
            &Arc::new(UsersState::default()),
            &UsersEvent::FetchRequested {
                id: UserId::new("auth0|1"),
            }
            .into(),
        );
        assert!(requested.is_fetching);
        assert!(requested.is_in_flight(&UserId::new("auth0|1")));

        let next = UsersState::reduce(
            &requested,
            &UsersEvent::Fetched {
                id: UserId::new("auth0|1"),
                user: profile("auth0|1"),
                received_at: at,
            }
            .into(),
        );
        assert_eq!(next.get(&UserId::new("auth0|1")), Some(&profile("auth0|1")));
        assert!(!next.is_fetching);
        assert!(next.in_flight.is_empty());
        assert_eq!(next.last_updated, Some(at));
    }

    #[rstest]
    fn login_profile_is_cached_without_a_fetch() {
        let next = UsersState::reduce(
            &Arc::new(UsersState::default()),
            &AuthEvent::LoginReceived {
                profile: profile("auth0|me"),
            }
            .into(),
        );
        assert!(next.get(&UserId::new("auth0|me")).is_some());
        assert!(!next.is_fetching);
    }

    #[rstest]
    fn failure_keeps_cached_profiles() {
        let mut seeded = UsersState {
            is_fetching: true,
            ..UsersState::default()
        };
        seeded.entities.insert(UserId::new("a"), profile("a"));
        seeded.in_flight.insert(UserId::new("b"));
        let next = UsersState::reduce(
            &Arc::new(seeded),
            &UsersEvent::FetchFailed {
                id: UserId::new("b"),
                error: SyncError::api(404, "user not found"),
            }
            .into(),
        );
        assert_eq!(next.entities.len(), 1);
        assert!(!next.is_in_flight(&UserId::new("b")));
        assert_eq!(next.error.as_ref().map(SyncError::message), Some("user not found"));
    }
}
