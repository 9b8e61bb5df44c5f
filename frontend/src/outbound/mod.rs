//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: the Q&A REST API over reqwest
//! - **identity**: a pre-issued token standing in for the browser login flow
//!
//! Adapters are thin translators between domain types and the wire. They
//! contain no synchronisation logic.

mod http;
mod identity;

pub use http::ReqwestTransport;
pub use identity::StaticTokenProvider;
