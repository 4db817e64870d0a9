//! Common test utilities for Confline scenario and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated temp directory plus helpers to run the confline binary
//! - `Session`: A config file engine on the local file system recording its messages
//! - Assertion macros: `assert_output_contains!`, `assert_output_not_contains!`
//! - Fixtures: Reusable registries, schemas and config files

pub mod assertions;
pub mod env;
pub mod fixtures;
pub mod session;

pub use env::*;
pub use fixtures::*;
pub use session::*;
