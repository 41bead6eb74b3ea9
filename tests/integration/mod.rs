//! Integration tests module
//!
//! This module contains the database-backed tests for the MentorWeb services,
//! organized by functionality.

/// Run a test body against a fresh context; the test is skipped when no
/// PostgreSQL instance can be reached
macro_rules! integration_test {
    ($test_name:ident, |$ctx:ident| $body:block) => {
        #[tokio::test]
        #[serial_test::serial]
        async fn $test_name() {
            let Some($ctx) = crate::helpers::TestContext::try_new().await else {
                return;
            };
            $body
        }
    };
}

pub mod availability_test;
pub mod comment_test;
