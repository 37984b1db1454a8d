use serde::Serialize;

/// The signed-in operator, attached to each authenticated request.
///
/// Resolved from the session cookie by `RequireAuth` and handed to handlers
/// through request extensions; there is no process-wide session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl AuthenticatedUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
