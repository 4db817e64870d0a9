//! ConfigDirs port - where config files are looked for

use std::path::PathBuf;

/// Platform specific config directories of an application, most specific first
pub trait ConfigDirs {
    /// Directories of the current user
    fn user_config_dirs(&self) -> Vec<PathBuf>;

    /// System wide directories
    fn site_config_dirs(&self) -> Vec<PathBuf>;

    /// Environment variables which influence the result, listed in the help
    fn influencing_variables(&self) -> Vec<&'static str> {
        Vec::new()
    }
}
