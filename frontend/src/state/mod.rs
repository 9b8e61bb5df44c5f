//! Client-side synchronisation state.
//!
//! Purpose: hold the normalised cache of remote entities and keep it in step
//! with the API through a dispatch-and-reduce pipeline.
//!
//! Public surface:
//! - [`Store`] owns the [`RootState`] tree and runs the dispatch chain.
//! - [`Gateway`] executes [`CallDescriptor`]s, the only effect besides thunks.
//! - Entity slices ([`QuestionsState`], [`AnswersState`], [`UsersState`],
//!   [`SearchState`], [`AuthState`]) reduce [`Event`]s through [`Reducer`].
//! - [`creators`] builds the actions the UI dispatches.

mod action;
mod answers;
mod auth;
mod call;
pub mod creators;
mod event;
mod gateway;
mod payload;
mod questions;
mod reducer;
mod root;
mod search;
mod store;
mod users;

pub use action::{Action, Thunk};
pub use answers::AnswersState;
pub use auth::AuthState;
pub use call::{API_PREFIX, CallDescriptor, Operation};
pub use event::{
    AnswersEvent, AuthEvent, AuthSession, Event, QuestionPage, QuestionsEvent, SearchEvent,
    SearchPage, SessionHandle, UsersEvent,
};
pub use gateway::Gateway;
pub use questions::QuestionsState;
pub use reducer::Reducer;
pub use root::RootState;
pub use search::SearchState;
pub use store::{DISPATCH_CHAIN, Dispatched, Link, Pending, Store, settled};
pub use users::UsersState;
