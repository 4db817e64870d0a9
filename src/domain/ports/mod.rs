//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the engine.
//! Infrastructure layer provides concrete implementations.

pub mod config_dirs;
pub mod environment;
pub mod file_system;
pub mod writer;

pub use config_dirs::ConfigDirs;
pub use environment::Environment;
pub use file_system::{FileSystem, FsError, FsResult};
pub use writer::{FormattedWriter, SectionLevel};
