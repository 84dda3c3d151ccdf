//! Signed-in staff session.
//!
//! Obtaining the token (password + OTP) happens outside this crate; the
//! store only carries it on requests. Nothing here is persisted.

use serde::{Deserialize, Serialize};
use shopdesk_core::types::User;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent as `Authorization: Bearer <token>`.
    pub token: String,

    /// Profile returned with the token, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Login response body: the user profile with its token inline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(flatten)]
    user: User,
    token: String,
}

impl Session {
    /// A session from a bare token (report tool, scripts).
    pub fn from_token(token: impl Into<String>) -> Self {
        Session {
            token: token.into(),
            user: None,
        }
    }

    /// Builds a session from the backend's login/verify response.
    ///
    /// ## Errors
    /// Fails when the body is not a user with a `token` field.
    pub fn from_login_response(body: &str) -> serde_json::Result<Self> {
        let response: LoginResponse = serde_json::from_str(body)?;
        Ok(Session {
            token: response.token,
            user: Some(response.user),
        })
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_login_response() {
        let body = r#"{
            "_id": "u1",
            "name": "Ravi",
            "email": "ravi@shop.test",
            "role": "admin",
            "isVerified": true,
            "token": "eyJhbGciOi.abc"
        }"#;
        let session = Session::from_login_response(body).unwrap();
        assert_eq!(session.token, "eyJhbGciOi.abc");
        assert_eq!(session.user_name(), Some("Ravi"));
        assert!(session.user.as_ref().is_some_and(|u| u.is_verified));
    }

    #[test]
    fn test_login_response_without_token_fails() {
        let body = r#"{"_id": "u1", "name": "Ravi", "email": "ravi@shop.test"}"#;
        assert!(Session::from_login_response(body).is_err());
    }
}
