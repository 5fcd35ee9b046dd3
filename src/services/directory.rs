use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use std::path::Path;

use crate::errors::{AppError, Result};
use crate::models::user::{UserRecord, UserResponse, Users};
use crate::store::FileCollection;

/// Identity operations over the users collection.
///
/// All mutations go through the collection's load-mutate-persist cycle,
/// so the duplicate-email check and the insert happen under the same
/// lock and two simultaneous signups cannot both claim one email.
pub struct UserDirectory {
    store: FileCollection<Users>,
}

impl UserDirectory {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            store: FileCollection::new(data_dir.join("users.json")),
        }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<()> {
        if password != confirm {
            return Err(AppError::invalid_data("Invalid sign up details"));
        }

        let password_hash = hash(password, DEFAULT_COST)?;
        let now = Utc::now();
        let record = UserRecord {
            name: name.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let email = email.to_string();
        self.store
            .update(move |users| {
                if users.contains_key(&email) {
                    return Err(AppError::UserExists);
                }
                users.insert(email, record);
                Ok(())
            })
            .await
    }

    /// Exact email lookup plus password verification. Every failure
    /// collapses into `InvalidCredentials`; callers learn nothing about
    /// whether the email exists.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let users = self.store.read().await?;
        let record = users.get(email).ok_or(AppError::InvalidCredentials)?;

        let valid =
            verify(password, &record.password_hash).map_err(|_| AppError::InvalidCredentials)?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        Ok(record.name.clone())
    }

    pub async fn contains(&self, email: &str) -> Result<bool> {
        Ok(self.store.read().await?.contains_key(email))
    }

    /// Full collection with credential material stripped.
    pub async fn list(&self) -> Result<Vec<UserResponse>> {
        let users = self.store.read().await?;
        Ok(users
            .into_iter()
            .map(|(email, record)| UserResponse {
                name: record.name,
                email,
                created_at: record.created_at,
            })
            .collect())
    }

    pub async fn reset_password(&self, email: &str, password: &str, confirm: &str) -> Result<()> {
        if password != confirm {
            return Err(AppError::invalid_data("Passwords do not match"));
        }

        let password_hash = hash(password, DEFAULT_COST)?;
        let email = email.to_string();
        self.store
            .update(move |users| {
                let record = users.get_mut(&email).ok_or(AppError::UserNotFound)?;
                record.password_hash = password_hash;
                record.updated_at = Utc::now();
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn directory(dir: &TempDir) -> UserDirectory {
        UserDirectory::new(dir.path())
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        users
            .register("Ada", "ada@x.com", "hunter2", "hunter2")
            .await
            .unwrap();

        let name = users.authenticate("ada@x.com", "hunter2").await.unwrap();
        assert_eq!(name, "Ada");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        users
            .register("Ada", "ada@x.com", "hunter2", "hunter2")
            .await
            .unwrap();
        let err = users
            .register("Other", "ada@x.com", "different", "different")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserExists));

        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn password_confirmation_must_match() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        let err = users
            .register("Ada", "ada@x.com", "hunter2", "hunter3")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        users
            .register("Ada", "ada@x.com", "hunter2", "hunter2")
            .await
            .unwrap();

        let err = users.authenticate("Ada@x.com", "hunter2").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        users
            .register("Ada", "ada@x.com", "hunter2", "hunter2")
            .await
            .unwrap();

        let err = users.authenticate("ada@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn reset_password_round_trip() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        users
            .register("Ada", "ada@x.com", "old-pass", "old-pass")
            .await
            .unwrap();
        users
            .reset_password("ada@x.com", "new-pass", "new-pass")
            .await
            .unwrap();

        users.authenticate("ada@x.com", "new-pass").await.unwrap();
        let err = users
            .authenticate("ada@x.com", "old-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn reset_password_unknown_email() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);

        let err = users
            .reset_password("ghost@x.com", "pass", "pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn concurrent_registrations_both_persist() {
        let dir = TempDir::new().unwrap();
        let users = Arc::new(directory(&dir));

        let a = {
            let users = Arc::clone(&users);
            tokio::spawn(async move { users.register("Ada", "ada@x.com", "pw-a", "pw-a").await })
        };
        let b = {
            let users = Arc::clone(&users);
            tokio::spawn(async move { users.register("Bob", "bob@x.com", "pw-b", "pw-b").await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let listed = users.list().await.unwrap();
        assert_eq!(listed.len(), 2, "no registration may be lost");
    }
}
