//! Core library for the syncboard dashboard.
//!
//! syncboard is the web dashboard of a media-sync tool; this crate holds the
//! stateful core behind it:
//!
//! - `auth`: the credential store owning the authentication session,
//!   persisted across restarts and restored at process start
//! - `api`: the gateway every outbound call goes through - bearer
//!   injection, envelope unwrapping, and forced logout on authentication
//!   rejection
//! - `views`: the multi-tab view session with fast-switch cache tracking
//!
//! Rendering, routing, and the sync backend itself stay outside; the core
//! reaches them through the `shell`, `storage`, and `api::transport` seams.

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod shell;
pub mod storage;
pub mod views;

pub use api::{ApiError, ApiGateway, HttpTransport};
pub use auth::{CredentialStore, Credentials, Session};
pub use config::Config;
pub use views::{ViewDescriptor, ViewSession, ViewTab};
