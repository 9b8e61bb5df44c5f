//! Client-side synchronisation layer for the Q&A API.
//!
//! The crate mirrors server entities into a normalised, paginated cache. UI
//! code dispatches [`state::Action`]s to a [`state::Store`]; API calls flow
//! through the [`state::Gateway`], which reduces request, success, and failure
//! events into the per-entity stores. Adapters for the HTTP API and the
//! identity provider live under [`outbound`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod state;
