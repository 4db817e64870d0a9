//! Home directory resolution with test isolation support.
//!
//! `dirs::home_dir()` ignores `HOME` on Windows, so tests set
//! `CONFLINE_TEST_HOME` instead.

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of the home directory
pub const CONFLINE_TEST_HOME_VAR: &str = "CONFLINE_TEST_HOME";

/// Home directory used for `~` expansion.
///
/// Returns `CONFLINE_TEST_HOME` if set, `dirs::home_dir()` otherwise.
pub fn confline_home_dir() -> Option<PathBuf> {
    std::env::var(CONFLINE_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Replace a leading `~` component with the home directory.
///
/// `~user` forms are left untouched.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, confline_home_dir())
}

fn expand_home_with(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home,
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
