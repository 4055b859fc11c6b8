//! Authentication session state.

use serde::{Deserialize, Serialize};

/// In-memory authentication session.
///
/// An empty token means logged out. The identity fields are set and cleared
/// together with the token, so the two never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: i64, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id,
            username: username.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Reset to the logged-out state.
    pub fn clear(&mut self) {
        *self = Session::default();
    }
}
