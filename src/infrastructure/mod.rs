//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Memory)
//! - `env` - Process and in-memory environments
//! - `app_dirs` - Platform config directories
//! - `writer` - Config file and help writers

pub mod app_dirs;
pub mod env;
pub mod fs;
pub mod writer;

// Re-export for convenience
pub use app_dirs::{AppDirs, FixedDirs};
pub use env::{MapEnv, ProcessEnv};
pub use fs::{LocalFs, MemoryFs};
pub use writer::{ConfigFileWriter, HelpWriter};
