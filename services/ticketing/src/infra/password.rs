use anyhow::Context as _;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::repository::PasswordPort;
use crate::error::TicketingServiceError;

/// Argon2id with the crate's default parameters, stored as a PHC string.
/// Hashing runs on the blocking pool.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl PasswordPort for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, TicketingServiceError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("join password hasher")?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, TicketingServiceError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .context("join password verifier")?
    }
}

fn hash_password(password: &str) -> Result<String, TicketingServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, TicketingServiceError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("parse stored password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
