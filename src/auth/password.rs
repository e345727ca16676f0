use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::error;

use crate::config::HashConfig;
use crate::error::AppError;

/// Argon2id hasher with a configured work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    // Hash of a random secret under `params`; verified against when the
    // account does not exist so both login paths cost one Argon2 run.
    decoy: Arc<str>,
}

impl PasswordHasher {
    pub fn new(cfg: HashConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?;
        let mut hasher = Self {
            params,
            decoy: Arc::from(""),
        };
        let secret: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        hasher.decoy = Arc::from(hasher.hash(&secret)?);
        Ok(hasher)
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let hash = argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Parameters are read back from the PHC string, so hashes made under an
    /// older work factor still verify.
    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    /// Runs [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, plain: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Runs [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, plain: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Spends one verification against the decoy hash. Always `false`.
    pub async fn verify_decoy(&self, plain: String) -> Result<bool, AppError> {
        let decoy = self.decoy.to_string();
        self.verify_blocking(plain, decoy).await.map(|_| false)
    }
}

#[cfg(test)]
pub(crate) fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::new(HashConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test params")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap_hasher();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();
        let a = hasher.hash("pw123").unwrap();
        let b = hasher.hash("pw123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verifies_hash_made_under_other_work_factor() {
        let old = cheap_hasher();
        let hash = old.hash("pw123").unwrap();
        let current = PasswordHasher::new(HashConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(current.verify("pw123", &hash).unwrap());
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap_hasher().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn rejects_impossible_params() {
        let res = PasswordHasher::new(HashConfig {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        });
        assert!(res.is_err());
    }

    #[test]
    fn decoy_hash_uses_configured_work_factor() {
        let hasher = cheap_hasher();
        assert!(hasher.decoy.starts_with("$argon2id$"));
        assert!(hasher.decoy.contains("m=1024,t=1,p=1"));
    }

    #[tokio::test]
    async fn decoy_verification_never_matches() {
        let hasher = cheap_hasher();
        assert!(!hasher.verify_decoy("pw123".into()).await.unwrap());
        assert!(!hasher.verify_decoy(String::new()).await.unwrap());
    }

    #[tokio::test]
    async fn blocking_helpers_roundtrip() {
        let hasher = cheap_hasher();
        let hash = hasher.hash_blocking("pw123".into()).await.unwrap();
        assert!(hasher.verify_blocking("pw123".into(), hash.clone()).await.unwrap());
        assert!(!hasher.verify_blocking("pw456".into(), hash).await.unwrap());
    }
}
