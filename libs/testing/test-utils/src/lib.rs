//! Shared test utilities for the users domain
//!
//! - `TestDatabase`: migrated PostgreSQL container with automatic cleanup (feature: "postgres")
//! - `TestDataBuilder`: per-test unique email addresses
//! - `assertions`: assertion helpers with readable failure messages
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let email = TestDataBuilder::from_test_name("my_test").email("owner");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Derives registration data from a seed so each test gets its own accounts
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Lowercase email unique to this seed
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.email("owner"), "owner-7@example.test");
    /// ```
    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@example.test", local, self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that a result is an error whose message contains `needle`
    pub fn assert_err_contains<T: std::fmt::Debug, E: std::fmt::Display>(
        result: Result<T, E>,
        needle: &str,
    ) {
        match result {
            Ok(value) => panic!("expected error containing '{}', got Ok({:?})", needle, value),
            Err(e) => assert!(
                e.to_string().contains(needle),
                "expected error containing '{}', got '{}'",
                needle,
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_stable_per_test_name() {
        let first = TestDataBuilder::from_test_name("my_test");
        let second = TestDataBuilder::from_test_name("my_test");

        assert_eq!(first.email("owner"), second.email("owner"));
    }

    #[test]
    fn test_email_is_lowercase_and_unique() {
        let builder1 = TestDataBuilder::from_test_name("email_a");
        let builder2 = TestDataBuilder::from_test_name("email_b");

        let email = builder1.email("owner");
        assert_eq!(email, email.to_lowercase());
        assert_ne!(email, builder2.email("owner"));
    }

    #[test]
    #[should_panic(expected = "expected error containing")]
    fn test_assert_err_contains_panics_on_ok() {
        assertions::assert_err_contains::<u8, String>(Ok(1), "boom");
    }

    #[test]
    #[should_panic(expected = "owner id")]
    fn test_assert_uuid_eq_names_context() {
        assertions::assert_uuid_eq(uuid::Uuid::nil(), uuid::Uuid::max(), "owner id");
    }
}
