use chrono::Utc;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

use crate::errors::{AppError, Result};
use crate::models::otp::{OtpRecord, Otps};
use crate::services::directory::UserDirectory;
use crate::store::FileCollection;

/// Codes older than this are rejected as expired.
const OTP_MAX_AGE_MS: i64 = 5 * 60 * 1000;

/// Issuance and verification of one-time codes, one live code per email.
pub struct OtpLedger {
    store: FileCollection<Otps>,
    directory: Arc<UserDirectory>,
}

impl OtpLedger {
    pub fn new(data_dir: &Path, directory: Arc<UserDirectory>) -> Self {
        Self {
            store: FileCollection::new(data_dir.join("otps.json")),
            directory,
        }
    }

    // 6-digit code, uniform over [100000, 999999]
    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        rng.gen_range(100_000..=999_999).to_string()
    }

    /// Issue a fresh code for `email`, overwriting any outstanding one
    /// and resetting its clock. The caller is responsible for delivery;
    /// the issued code is already persisted when this returns.
    pub async fn issue(&self, email: &str) -> Result<String> {
        if !self.directory.contains(email).await? {
            return Err(AppError::UserNotFound);
        }

        let code = Self::generate_code();
        let record = OtpRecord {
            code: code.clone(),
            issued_at: Utc::now(),
        };

        let email = email.to_string();
        self.store
            .update(move |otps| {
                otps.insert(email, record);
                Ok(())
            })
            .await?;

        Ok(code)
    }

    /// Check `submitted` against the outstanding code for `email`.
    ///
    /// The submitted value is trimmed of surrounding whitespace; the
    /// stored code is compared as-is. Expiry is checked only after the
    /// codes match. A successful verification consumes the entry, so a
    /// code cannot be replayed.
    pub async fn verify(&self, email: &str, submitted: &str) -> Result<()> {
        let submitted = submitted.trim().to_string();
        let email = email.to_string();

        self.store
            .update(move |otps| {
                let record = otps.get(&email).ok_or(AppError::InvalidOtp)?;

                if record.code != submitted {
                    return Err(AppError::InvalidOtp);
                }

                let age = Utc::now() - record.issued_at;
                if age.num_milliseconds() > OTP_MAX_AGE_MS {
                    return Err(AppError::OtpExpired);
                }

                otps.remove(&email);
                Ok(())
            })
            .await
    }

    #[cfg(test)]
    async fn backdate(&self, email: &str, age_ms: i64) {
        let email = email.to_string();
        self.store
            .update(move |otps| {
                let record = otps.get_mut(&email).expect("no OTP to backdate");
                record.issued_at = Utc::now() - chrono::Duration::milliseconds(age_ms);
                Ok(())
            })
            .await
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn ledger_with_user(dir: &TempDir, email: &str) -> OtpLedger {
        let directory = Arc::new(UserDirectory::new(dir.path()));
        directory
            .register("Ada", email, "hunter2", "hunter2")
            .await
            .unwrap();
        OtpLedger::new(dir.path(), directory)
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = OtpLedger::generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[tokio::test]
    async fn issue_then_verify() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let code = ledger.issue("a@x.com").await.unwrap();
        ledger.verify("a@x.com", &code).await.unwrap();
    }

    #[tokio::test]
    async fn submitted_code_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let code = ledger.issue("a@x.com").await.unwrap();
        ledger
            .verify("a@x.com", &format!("{code} "))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_code_is_invalid() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let code = ledger.issue("a@x.com").await.unwrap();
        let wrong = if code == "482913" { "482914" } else { "482913" };

        let err = ledger.verify("a@x.com", wrong).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOtp));
    }

    #[tokio::test]
    async fn missing_record_is_invalid() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let err = ledger.verify("a@x.com", "123456").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOtp));
    }

    #[tokio::test]
    async fn issue_requires_registered_user() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let err = ledger.issue("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn stale_code_is_expired() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let code = ledger.issue("a@x.com").await.unwrap();
        ledger.backdate("a@x.com", OTP_MAX_AGE_MS + 1_000).await;

        let err = ledger.verify("a@x.com", &code).await.unwrap_err();
        assert!(matches!(err, AppError::OtpExpired));
    }

    #[tokio::test]
    async fn reissue_invalidates_previous_code() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let old = ledger.issue("a@x.com").await.unwrap();
        let mut new = ledger.issue("a@x.com").await.unwrap();
        // the draw can repeat; force a distinct pair for the assertion
        while new == old {
            new = ledger.issue("a@x.com").await.unwrap();
        }

        let err = ledger.verify("a@x.com", &old).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOtp));
        ledger.verify("a@x.com", &new).await.unwrap();
    }

    #[tokio::test]
    async fn verified_code_cannot_be_replayed() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_with_user(&dir, "a@x.com").await;

        let code = ledger.issue("a@x.com").await.unwrap();
        ledger.verify("a@x.com", &code).await.unwrap();

        let err = ledger.verify("a@x.com", &code).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOtp));
    }
}
