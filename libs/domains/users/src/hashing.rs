use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use core_config::SecurityConfig;

use crate::error::{UserError, UserResult};

/// One-way password hashing boundary
///
/// Implementations are CPU bound; the service runs them on the blocking pool.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted hash of `plaintext`
    fn hash(&self, plaintext: &str) -> UserResult<String>;

    /// Check `plaintext` against a hash produced by [`CredentialHasher::hash`]
    fn compare(&self, plaintext: &str, hash: &str) -> UserResult<bool>;
}

/// Argon2id hasher whose cost comes from [`SecurityConfig`]
///
/// `hash_rounds` is the time cost, `hash_memory_kib` the memory cost.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(config: &SecurityConfig) -> UserResult<Self> {
        let params = Params::new(config.hash_memory_kib, config.hash_rounds, 1, None)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn compare(&self, plaintext: &str, hash: &str) -> UserResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(UserError::PasswordHash(e.to_string())),
        }
    }
}
