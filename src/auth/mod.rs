//! Authentication module for the session lifecycle.
//!
//! This module provides:
//! - `Session`: the in-memory token + identity pair
//! - `CredentialStore`: login/logout, persistence, and restore-at-start
//! - `Authenticator`: the seam to whatever performs the login exchange
//!
//! The session is persisted through `storage::KeyValueStorage` and restored
//! when the store is created.

pub mod session;
pub mod store;

pub use session::Session;
pub use store::{AuthenticatedUser, Authenticator, CredentialStore, Credentials};
pub use store::{TOKEN_KEY, USERNAME_KEY, USER_ID_KEY};
