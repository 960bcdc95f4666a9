//! Username/password verification for `/login`.
//!
//! Passwords are stored as Argon2 PHC strings (`$argon2id$...`). Hashing is
//! CPU-bound, so verification runs on the blocking pool. A lookup miss is
//! verified against a throwaway hash, so unknown usernames cost the same as
//! wrong passwords.
use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::repos::admin_user_repo;
use crate::repos::error::RepoError;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Authenticated admin user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(None)` for unknown user, inactive user or wrong password; the
    /// caller cannot tell these apart.
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Principal>, CredentialError>;
}

pub fn hash_password(password: &str, salt: &SaltString) -> Result<String, CredentialError> {
    Argon2::default()
        .hash_password(password.as_bytes(), salt)
        .map(|h| h.to_string())
        .map_err(CredentialError::Hash)
}

/// Hash of a random password nobody knows, with the same parameters as real hashes.
static MISS_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).ok()?;
    hash_password(&Uuid::new_v4().to_string(), &salt).ok()
});

/// Verifies `password` against `phc`, or against [`MISS_HASH`] when there is
/// no stored hash. A miss never matches.
pub async fn check_password(password: &str, phc: Option<String>) -> Result<bool, CredentialError> {
    match phc {
        Some(phc) => verify_password(password.to_string(), phc).await,
        None => {
            if let Some(miss) = MISS_HASH.clone() {
                verify_password(password.to_string(), miss).await?;
            }
            Ok(false)
        }
    }
}

pub async fn verify_password(password: String, phc: String) -> Result<bool, CredentialError> {
    let matched = tokio::task::spawn_blocking(move || {
        let parsed = match PasswordHash::new(&phc) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "stored password hash is not a valid PHC string");
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await?;

    Ok(matched)
}

/// Verifier backed by the `admin_user` table.
#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialVerifier for PgCredentialStore {
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Principal>, CredentialError> {
        let row = admin_user_repo::find_active_by_username(&self.db, username).await?;
        if row.is_none() {
            debug!("login for unknown or inactive user");
        }

        let phc = row.as_ref().map(|r| r.password_hash.clone());
        if !check_password(password, phc).await? {
            return Ok(None);
        }

        Ok(row.map(|row| Principal {
            user_id: row.user_id,
            username: row.username,
        }))
    }
}
