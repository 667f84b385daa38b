//! Travel booking backend: accounts, trips, and seat bookings over REST.
//!
//! Layout follows ports and adapters: [`domain`] holds the model, services,
//! and port traits; [`inbound`] and [`outbound`] adapt them to HTTP and to
//! storage; [`server`] wires everything together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
