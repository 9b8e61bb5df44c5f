//! User profile creators.

use tracing::trace;

use crate::domain::ports::HttpMethod;
use crate::domain::{AccessToken, UserId};
use crate::state::{API_PREFIX, CallDescriptor, Dispatched, Operation, Thunk, settled};

/// Fetch one profile.
pub fn fetch_user(id: &UserId, token: Option<&AccessToken>) -> CallDescriptor {
    CallDescriptor::new(
        Operation::FetchUser { id: id.clone() },
        HttpMethod::Get,
        format!("{API_PREFIX}/users/{id}"),
    )
    .with_token(token)
}

/// Fetch one profile unless it is cached, already being fetched, or `id` is
/// blank.
pub fn load_user(id: UserId, token: Option<AccessToken>) -> Thunk {
    Thunk::new(move |store| {
        let state = store.state();
        if id.is_blank()
            || state.users.entities.contains_key(&id)
            || state.users.is_in_flight(&id)
        {
            trace!(%id, "user cached, in flight, or blank; skipping fetch");
            return settled(Dispatched::Skipped);
        }
        store.dispatch(fetch_user(&id, token.as_ref()))
    })
}
