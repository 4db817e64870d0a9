//! File System Implementations
//!
//! Concrete implementations of the FileSystem port.

mod home;
mod local;
mod memory;

pub use home::{confline_home_dir, expand_home, CONFLINE_TEST_HOME_VAR};
pub use local::LocalFs;
pub use memory::MemoryFs;
