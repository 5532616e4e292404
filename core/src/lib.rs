//! Async client core for the Fitbit Web API.
//!
//! # Overview
//! `FitbitClient` builds `HttpRequest` values, sends them through an injected
//! `Transport`, and parses each `HttpResponse` into an `ApiResponse` envelope.
//! Production code uses `ReqwestTransport`; tests use `StubTransport` to
//! return canned responses and inspect the requests the client sent.
//!
//! # Design
//! - `FitbitClient` is stateless apart from its base URL and bearer token.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), with an async method running one round trip.
//! - Provider errors (non-2xx with an `errors` list) come back as
//!   `ApiResponse::Failure`. Transport and deserialization failures are
//!   `ApiError`s.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::FitbitClient;
pub use config::ClientConfig;
pub use envelope::{ApiResponse, ErrorBody, ErrorDescriptor, ErrorList};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
#[cfg(feature = "reqwest-transport")]
pub use transport::ReqwestTransport;
pub use transport::StubTransport;
pub use types::{Device, DeviceType};

pub use tokio_util::sync::CancellationToken;
