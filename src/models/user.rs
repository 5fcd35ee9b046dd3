use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// The users collection, keyed by email.
///
/// Email matching is byte-exact and case-sensitive: `A@x.com` and
/// `a@x.com` are distinct accounts.
pub type Users = BTreeMap<String, UserRecord>;

/// A registered account as persisted in the users collection.
///
/// Only the bcrypt hash of the password is stored; the plaintext never
/// leaves the registration or login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Request fields default to empty rather than rejecting at the serde
// layer, so a missing field reports the same 400 as an empty one.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid sign up details"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid sign up details"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid sign up details"))]
    pub password: String,

    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// No field-level checks here: the confirmation mismatch must be
// reported before an unknown email, and an empty email falls out of the
// directory lookup as "User not found" anyway.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub confirm: String,
}

/// Public view of an account: everything except credential material.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub name: String,
    pub redirect: String,
}
