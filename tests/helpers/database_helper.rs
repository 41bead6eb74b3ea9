//! Test database helper utilities
//!
//! This module provides utilities for setting up and managing test databases.
//! `TEST_DATABASE_URL` wins when set; otherwise a throwaway PostgreSQL
//! container is started. Tests are skipped when neither is reachable.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Once;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres as PostgresImage;

static INIT: Once = Once::new();

pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    /// Create a migrated, empty test database
    pub async fn new() -> Result<Self, TestError> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("MentorWeb=debug")
                .with_test_writer()
                .try_init();
        });

        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let container = PostgresImage::default().start().await?;
                let host = container.get_host().await?;
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
                (url, Some(container))
            }
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let database = Self {
            pool,
            database_url,
            _container: container,
        };
        database.cleanup().await?;

        Ok(database)
    }

    /// Like `new`, but reports and returns `None` when no database is available
    pub async fn try_new() -> Option<Self> {
        match Self::new().await {
            Ok(database) => Some(database),
            Err(e) => {
                eprintln!("skipping database test, no PostgreSQL available: {}", e);
                None
            }
        }
    }

    /// Clean all test data from the database
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            TRUNCATE appointment_comments, appointments, availabilities, programs,
                     courses, users
            RESTART IDENTITY CASCADE
            "#
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Execute raw SQL for custom test scenarios
    pub async fn execute_sql(&self, sql: &str) -> Result<sqlx::postgres::PgQueryResult, sqlx::Error> {
        sqlx::query(sql).execute(&self.pool).await
    }

    /// Count records in a table
    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Count rows in a table matching a SQL condition
    pub async fn count_records_where(&self, table: &str, condition: &str) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE {}", table, condition))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
