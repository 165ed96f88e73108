//! User identity lookup.

use serde::Deserialize;

use crate::error::Result;
use crate::http::Transport;

/// An authenticated Axiom user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Client for the user endpoints.
#[derive(Debug, Clone)]
pub struct UsersClient {
    transport: Transport,
}

impl UsersClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Returns the user the session's token belongs to.
    pub fn current(&self) -> Result<User> {
        self.transport.get("user")
    }
}
