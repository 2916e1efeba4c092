use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    /// Hash with the same parameters as stored ones, verified against when a
    /// login names a user that does not exist.
    static ref DUMMY_HASH: anyhow::Result<String> = hash_password("solitaire-dummy-password");
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Argon2's verifier compares tags in constant time.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hashes on the blocking pool so request workers stay free.
pub async fn hash(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task failed")?
}

pub async fn verify(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("password verify task failed")?
}

/// Runs a full verification against a throwaway hash so a missing user costs
/// the same as a wrong password.
pub async fn verify_dummy(plain: String) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || {
        let hash = DUMMY_HASH
            .as_ref()
            .map_err(|e| anyhow::anyhow!("dummy hash unavailable: {e}"))?;
        verify_password(&plain, hash).map(|_| ())
    })
    .await
    .context("password verify task failed")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("abc123").unwrap();
        let b = hash_password("abc123").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("abc123"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn async_wrappers_run_off_thread() {
        let hash = hash("abc123".to_string()).await.unwrap();
        assert!(verify("abc123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify("abc124".to_string(), hash).await.unwrap());
    }

    #[test]
    fn dummy_hash_uses_stored_hash_parameters() {
        let dummy = DUMMY_HASH.as_ref().unwrap();
        let real = hash_password("abc123").unwrap();
        let params = |h: &str| h.rsplitn(3, '$').nth(2).unwrap().to_owned();
        assert_eq!(params(dummy), params(&real));
        assert!(!verify_password("solitaire", dummy).unwrap());
    }

    #[tokio::test]
    async fn verify_dummy_succeeds_for_any_input() {
        verify_dummy("abc123".into()).await.unwrap();
        verify_dummy(String::new()).await.unwrap();
    }
}
