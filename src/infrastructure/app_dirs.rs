//! Config directory adapters

use std::path::PathBuf;

use crate::domain::ports::{ConfigDirs, Environment};

/// Platform config directories of an application.
///
/// On Linux and the BSDs the XDG base directory variables are honoured:
/// `XDG_CONFIG_HOME` (default `~/.config`) for the user and each entry of
/// `XDG_CONFIG_DIRS` (default `/etc/xdg`) for the site.
#[derive(Debug, Clone)]
pub struct AppDirs {
    user: Vec<PathBuf>,
    site: Vec<PathBuf>,
}

impl AppDirs {
    pub fn new(appname: &str, env: &dyn Environment) -> Self {
        Self {
            user: user_dirs(appname, env),
            site: site_dirs(appname, env),
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn user_dirs(appname: &str, env: &dyn Environment) -> Vec<PathBuf> {
    let base = env
        .get("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir);
    base.map(|b| vec![b.join(appname)]).unwrap_or_default()
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn user_dirs(appname: &str, _env: &dyn Environment) -> Vec<PathBuf> {
    dirs::config_dir()
        .map(|b| vec![b.join(appname)])
        .unwrap_or_default()
}

#[cfg(all(unix, not(target_os = "macos")))]
fn site_dirs(appname: &str, env: &dyn Environment) -> Vec<PathBuf> {
    let dirs = env
        .get("XDG_CONFIG_DIRS")
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/etc/xdg".to_string());
    std::env::split_paths(&dirs)
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.join(appname))
        .collect()
}

#[cfg(target_os = "macos")]
fn site_dirs(appname: &str, _env: &dyn Environment) -> Vec<PathBuf> {
    vec![PathBuf::from("/Library/Application Support").join(appname)]
}

#[cfg(windows)]
fn site_dirs(appname: &str, env: &dyn Environment) -> Vec<PathBuf> {
    env.get("PROGRAMDATA")
        .map(|p| vec![PathBuf::from(p).join(appname)])
        .unwrap_or_default()
}

#[cfg(not(any(unix, windows)))]
fn site_dirs(_appname: &str, _env: &dyn Environment) -> Vec<PathBuf> {
    Vec::new()
}

impl ConfigDirs for AppDirs {
    fn user_config_dirs(&self) -> Vec<PathBuf> {
        self.user.clone()
    }

    fn site_config_dirs(&self) -> Vec<PathBuf> {
        self.site.clone()
    }

    fn influencing_variables(&self) -> Vec<&'static str> {
        if cfg!(target_os = "linux") {
            vec!["XDG_CONFIG_HOME", "XDG_CONFIG_DIRS"]
        } else {
            Vec::new()
        }
    }
}

/// Fixed directories, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct FixedDirs {
    pub user: Vec<PathBuf>,
    pub site: Vec<PathBuf>,
}

impl FixedDirs {
    pub fn new(user: impl Into<PathBuf>) -> Self {
        Self {
            user: vec![user.into()],
            site: Vec::new(),
        }
    }

    pub fn with_site(mut self, site: impl Into<PathBuf>) -> Self {
        self.site.push(site.into());
        self
    }
}

impl ConfigDirs for FixedDirs {
    fn user_config_dirs(&self) -> Vec<PathBuf> {
        self.user.clone()
    }

    fn site_config_dirs(&self) -> Vec<PathBuf> {
        self.site.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::env::MapEnv;

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn app_dirs_follow_xdg_variables() {
        let env = MapEnv::with([
            ("XDG_CONFIG_HOME", "/home/u/.cfg"),
            ("XDG_CONFIG_DIRS", "/etc/one:/etc/two"),
        ]);
        let dirs = AppDirs::new("demo", &env);
        assert_eq!(dirs.user_config_dirs(), vec![PathBuf::from("/home/u/.cfg/demo")]);
        assert_eq!(
            dirs.site_config_dirs(),
            vec![PathBuf::from("/etc/one/demo"), PathBuf::from("/etc/two/demo")]
        );
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn app_dirs_default_site_dir() {
        let env = MapEnv::with([("XDG_CONFIG_HOME", "/h")]);
        let dirs = AppDirs::new("demo", &env);
        assert_eq!(dirs.site_config_dirs(), vec![PathBuf::from("/etc/xdg/demo")]);
    }

    #[test]
    fn fixed_dirs() {
        let dirs = FixedDirs::new("/u").with_site("/s");
        assert_eq!(dirs.user_config_dirs(), vec![PathBuf::from("/u")]);
        assert_eq!(dirs.site_config_dirs(), vec![PathBuf::from("/s")]);
        assert!(dirs.influencing_variables().is_empty());
    }
}
