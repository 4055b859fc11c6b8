//! REST API gateway module.
//!
//! This module provides the `ApiGateway` every outbound call goes through,
//! the `Transport` seam it sends over, and the user endpoints used for the
//! login exchange.
//!
//! The gateway injects the session's bearer token, collapses `{code,
//! message, data}` envelopes, and turns authentication rejections into a
//! forced session teardown.

pub mod error;
pub mod gateway;
pub mod transport;
pub mod user;

pub use error::ApiError;
pub use gateway::ApiGateway;
pub use transport::{HttpTransport, Method, RequestOptions, Transport, TransportError};
pub use user::UserApi;
