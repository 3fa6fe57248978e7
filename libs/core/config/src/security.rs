use crate::{env_parse, ConfigError, FromEnv};

/// Default number of hashing rounds (argon2 time cost)
pub const DEFAULT_HASH_ROUNDS: u32 = 12;

/// Default argon2 memory cost in KiB (19 MiB)
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

/// Password hashing cost settings
///
/// Cost is fixed per process; individual requests cannot tune it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Iterations over the memory block
    pub hash_rounds: u32,
    /// Memory block size in KiB
    pub hash_memory_kib: u32,
}

impl SecurityConfig {
    pub fn new(hash_rounds: u32) -> Self {
        Self {
            hash_rounds,
            ..Self::default()
        }
    }

    pub fn with_memory_kib(mut self, hash_memory_kib: u32) -> Self {
        self.hash_memory_kib = hash_memory_kib;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            hash_rounds: DEFAULT_HASH_ROUNDS,
            hash_memory_kib: DEFAULT_HASH_MEMORY_KIB,
        }
    }
}

impl FromEnv for SecurityConfig {
    /// Reads:
    /// - HASH_ROUNDS: defaults to 12, must be at least 1
    /// - HASH_MEMORY_KIB: defaults to 19456
    fn from_env() -> Result<Self, ConfigError> {
        let hash_rounds: u32 = env_parse("HASH_ROUNDS", &DEFAULT_HASH_ROUNDS.to_string())?;
        if hash_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HASH_ROUNDS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        let hash_memory_kib: u32 =
            env_parse("HASH_MEMORY_KIB", &DEFAULT_HASH_MEMORY_KIB.to_string())?;

        Ok(Self {
            hash_rounds,
            hash_memory_kib,
        })
    }
}
