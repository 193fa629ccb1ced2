//! Transport layer for the Copilot client.
//!
//! Implements [`copilot_core::gateway::BackendGateway`] over HTTP.

pub mod http_gateway;

pub use http_gateway::HttpBackendGateway;
