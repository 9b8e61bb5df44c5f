//! Action creators and thunks, one module per entity.
//!
//! Plain creators build a [`CallDescriptor`](super::CallDescriptor); the
//! gateway only refuses one when it fetches an id that is already in flight.
//! `load_*` creators return a [`Thunk`](super::Thunk) that first consults the
//! cache and settles as [`Dispatched::Skipped`](super::Dispatched::Skipped)
//! when a fetch would be pointless.

mod answers;
mod auth;
mod questions;
mod search;
mod users;

pub use answers::{delete_answer, fetch_answer, load_answer, post_answer};
pub use auth::{init_auth, is_redirect_callback, login, logout};
pub use questions::{
    FIRST_QUESTIONS_PAGE, delete_question, fetch_question, fetch_questions, load_question,
    load_questions, patch_best_answer, post_question,
};
pub use search::{SEARCH_ENDPOINT, load_search, search_questions};
pub use users::{fetch_user, load_user};

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared store construction for creator tests.
    use std::sync::Arc;

    use mockable::DefaultClock;

    use crate::domain::ports::FixtureApiTransport;
    use crate::state::{Gateway, RootState, Store};

    pub(crate) fn store_with(transport: &Arc<FixtureApiTransport>, state: RootState) -> Store {
        Store::with_state(
            Gateway::new(Arc::clone(transport) as _, Arc::new(DefaultClock)),
            state,
        )
    }
}
