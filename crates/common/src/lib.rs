// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the `CoffeeCo` web client and server.
//! This module defines the JSON bodies exchanged by the user API.

use serde::{Deserialize, Serialize};

/// Database identifier of a user
pub type UserId = i64;

/// Name of the cookie carrying the login token
pub const LOGIN_COOKIE: &str = "LOGIN";

/// Body of `POST /api/user/add`
/// # Fields
/// * `username` - Unique name of the new account
/// * `password` - Plaintext password, hashed server side
/// * `email` - Contact address
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Body of `POST /api/user/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub id: UserId,
    pub password: String,
}

/// Reply carrying only a user id
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdResponse {
    #[serde(rename = "ID")]
    pub id: UserId,
}

/// Non-personal view of a user, as returned by the lookup routes
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    #[serde(rename = "ID")]
    pub id: UserId,
    #[serde(rename = "USERNAME")]
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_response_uses_upper_case_key() {
        let json = serde_json::to_string(&UserIdResponse { id: 7 }).unwrap();
        assert_eq!(json, r#"{"ID":7}"#);
    }

    #[test]
    fn test_public_user_shape() {
        let user: PublicUser = serde_json::from_str(r#"{"ID":1,"USERNAME":"alice"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_new_user_request_fields() {
        let req: NewUserRequest =
            serde_json::from_str(r#"{"username":"bob","password":"pw","email":"b@y.com"}"#)
                .unwrap();
        assert_eq!(req.username, "bob");
        assert_eq!(req.email, "b@y.com");
    }
}
