//! ConfigFile Options
//!
//! Configuration types for constructing a config file engine and for saving.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::command::CommandRegistry;
use crate::config::ConfigId;
use crate::help::DEFAULT_WIDTH;
use crate::notify::NotificationLevel;

/// Validates the config id of a `[id]` line, the error becomes a notification
pub type ConfigIdValidator = Arc<dyn Fn(&ConfigId) -> Result<(), String> + Send + Sync>;

/// Options for [`ConfigFile`](super::ConfigFile)
#[derive(Clone)]
pub struct ConfigFileOptions {
    /// Name of the application, used for the config directories and as
    /// prefix of environment variables
    pub appname: String,
    /// Messages less important than this are not passed to the ui callback
    pub notification_level: NotificationLevel,
    /// Whether `[id]` lines open a group. `None` enables groups if a
    /// validator is given or a multi setting exists.
    pub enable_config_ids: Option<bool>,
    pub check_config_id: Option<ConfigIdValidator>,
    pub commands: CommandRegistry,
    /// Load and save exactly this file
    pub config_path: Option<PathBuf>,
    /// Look for the config file only in this directory
    pub config_directory: Option<PathBuf>,
    /// File name inside the config directories
    pub config_name: String,
    /// Line width of the generated help
    pub help_width: usize,
}

impl fmt::Debug for ConfigFileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFileOptions")
            .field("appname", &self.appname)
            .field("notification_level", &self.notification_level)
            .field("enable_config_ids", &self.enable_config_ids)
            .field("check_config_id", &self.check_config_id.is_some())
            .field("commands", &self.commands)
            .field("config_path", &self.config_path)
            .field("config_directory", &self.config_directory)
            .field("config_name", &self.config_name)
            .field("help_width", &self.help_width)
            .finish()
    }
}

impl ConfigFileOptions {
    pub fn new(appname: impl Into<String>) -> Self {
        Self {
            appname: appname.into(),
            notification_level: NotificationLevel::Error,
            enable_config_ids: None,
            check_config_id: None,
            commands: CommandRegistry::with_defaults(),
            config_path: None,
            config_directory: None,
            config_name: "config".to_string(),
            help_width: DEFAULT_WIDTH,
        }
    }

    pub fn with_notification_level(mut self, level: NotificationLevel) -> Self {
        self.notification_level = level;
        self
    }

    pub fn with_config_ids(mut self, enable: bool) -> Self {
        self.enable_config_ids = Some(enable);
        self
    }

    /// Called for every `[id]` line except the default id
    pub fn with_config_id_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&ConfigId) -> Result<(), String> + Send + Sync + 'static,
    {
        self.check_config_id = Some(Arc::new(check));
        self
    }

    pub fn with_commands(mut self, commands: CommandRegistry) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_config_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config_directory = Some(directory.into());
        self
    }

    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = name.into();
        self
    }

    pub fn with_help_width(mut self, width: usize) -> Self {
        self.help_width = width;
        self
    }
}

/// What [`ConfigFile::save`](super::ConfigFile::save) writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Keys in the order to write them, all exported settings sorted by key
    /// if `None`. A DictConfig prefix stands for all of its members.
    pub keys: Option<Vec<String>>,
    /// Keys or DictConfig prefixes not to write
    pub ignore: BTreeSet<String>,
    /// Write the default values of multi settings only, without `[id]`
    /// sections. `None` means unless config ids are enabled.
    pub no_multi: Option<bool>,
    /// Write the allowed values and help of every setting as comments
    pub comments: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            keys: None,
            ignore: BTreeSet::new(),
            no_multi: None,
            comments: true,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn ignoring<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_no_multi(mut self, no_multi: bool) -> Self {
        self.no_multi = Some(no_multi);
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}
