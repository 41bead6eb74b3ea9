//! Test helpers module
//!
//! This module provides utilities and helpers for testing the MentorWeb application.
//! It includes the mock mail relay, database helpers, and test context setup.

#![allow(dead_code)]

pub mod database_helper;
pub mod mail_mock;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use mail_mock::*;
pub use test_context::*;
pub use test_data::*;
