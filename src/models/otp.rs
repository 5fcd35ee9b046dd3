use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// The OTP collection, keyed by email. At most one live code per email;
/// a fresh issuance overwrites whatever was there.
pub type Otps = BTreeMap<String, OtpRecord>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OtpRecord {
    pub code: String, // 6-digit OTP
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email required"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}
