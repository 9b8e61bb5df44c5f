//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_transport;
mod identity;

#[cfg(test)]
pub use api_transport::MockApiTransport;
pub use api_transport::{
    ApiRequest, ApiResponse, ApiTransport, ApiTransportError, FixtureApiTransport, HttpMethod,
};
#[cfg(test)]
pub use identity::MockIdentityProvider;
pub use identity::{
    FixtureIdentityProvider, FixtureIdentitySession, IdentityConfig, IdentityError,
    IdentityProvider, IdentitySession,
};
