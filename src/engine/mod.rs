//! The config file engine
//!
//! A [`ConfigFile`] owns the settings [`Registry`] and one instance of every
//! command. It reads config files line by line, dispatching each line to a
//! command, reads environment variables, writes the current values back to
//! a file, generates the help and completes partially typed lines.
//!
//! Errors in a line are reported through the notifier and never abort
//! loading, see [`ConfigFile::set_ui_callback`].
//!
//! ```
//! use confline::config::Registry;
//! use confline::engine::{ConfigFile, ConfigFileOptions, Ports};
//! use confline::infrastructure::{FixedDirs, MapEnv, MemoryFs};
//!
//! let mut registry = Registry::new();
//! let color = registry.define("color", "auto".to_string()).register().unwrap();
//!
//! let ports = Ports::new(MemoryFs::new(), MapEnv::new(), FixedDirs::new("/cfg/app"));
//! let mut config_file = ConfigFile::with_ports(registry, ConfigFileOptions::new("app"), ports);
//! assert!(config_file.parse_line("set color = red"));
//! assert_eq!(color.get(config_file.registry()).unwrap(), "red");
//! ```

mod complete;
mod load;
mod options;
mod save;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::command::{Command, UnknownCommand, DEFAULT_COMMAND};
use crate::config::{ConfigId, Registry, Setting, Value};
use crate::domain::ports::{ConfigDirs, Environment, FileSystem, FormattedWriter, SectionLevel};
use crate::error::ParseError;
use crate::help::HelpFormatter;
use crate::infrastructure::{AppDirs, HelpWriter, LocalFs, ProcessEnv};
use crate::notify::{Message, SourceContext, UiNotifier};

pub use options::{ConfigFileOptions, ConfigIdValidator, SaveOptions};

/// Lines starting with one of these are ignored
pub const COMMENT_PREFIXES: [&str; 2] = ["\"", "#"];

const ENTER_GROUP_PREFIX: char = '[';
const ENTER_GROUP_SUFFIX: char = ']';

/// The outside world of a [`ConfigFile`]
pub struct Ports {
    pub fs: Box<dyn FileSystem>,
    pub env: Box<dyn Environment>,
    pub dirs: Box<dyn ConfigDirs>,
}

impl Ports {
    pub fn new<F, E, D>(fs: F, env: E, dirs: D) -> Self
    where
        F: FileSystem + 'static,
        E: Environment + 'static,
        D: ConfigDirs + 'static,
    {
        Self {
            fs: Box::new(fs),
            env: Box::new(env),
            dirs: Box::new(dirs),
        }
    }

    /// Local file system, process environment and the platform config directories
    pub fn system(appname: &str) -> Self {
        let dirs = AppDirs::new(appname, &ProcessEnv);
        Self::new(LocalFs::new(), ProcessEnv, dirs)
    }
}

struct CommandEntry {
    names: Vec<String>,
    command: Rc<dyn Command>,
}

/// Reads and writes config files for a registry of settings
pub struct ConfigFile {
    registry: Registry,
    commands: Vec<CommandEntry>,
    notifier: UiNotifier,
    context: SourceContext,
    /// The group of the settings in the lines being read, `None` for the default group
    config_id: Option<ConfigId>,
    enable_config_ids: bool,
    check_config_id: Option<ConfigIdValidator>,
    env_prefix: String,
    /// Reserved environment variables which configure the engine itself
    env_variables: Vec<String>,
    config_path: Option<PathBuf>,
    config_directory: Option<PathBuf>,
    config_name: String,
    help_width: usize,
    fs: Box<dyn FileSystem>,
    env: Box<dyn Environment>,
    dirs: Box<dyn ConfigDirs>,
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("registry", &self.registry)
            .field("commands", &self.commands.iter().map(|c| &c.names).collect::<Vec<_>>())
            .field("config_id", &self.config_id)
            .field("enable_config_ids", &self.enable_config_ids)
            .field("env_prefix", &self.env_prefix)
            .finish_non_exhaustive()
    }
}

impl ConfigFile {
    /// Explains `[config-id]` lines
    pub const HELP_CONFIG_ID: &'static str = "You can specify the object that a value shall refer to by inserting the line `[config-id]` above.
`config-id` must be replaced by the corresponding identifier for the object.";

    /// An engine working on the local file system and the process environment
    pub fn new(registry: Registry, options: ConfigFileOptions) -> Self {
        let ports = Ports::system(&options.appname);
        Self::with_ports(registry, options, ports)
    }

    pub fn with_ports(registry: Registry, options: ConfigFileOptions, ports: Ports) -> Self {
        let enable_config_ids = options
            .enable_config_ids
            .unwrap_or_else(|| options.check_config_id.is_some() || registry.has_multi());

        let env_prefix = env_name("", &format!("{}_", options.appname));
        let path_var = format!("{env_prefix}CONFIG_PATH");
        let directory_var = format!("{env_prefix}CONFIG_DIRECTORY");
        let name_var = format!("{env_prefix}CONFIG_NAME");

        let config_path = ports.env.get(&path_var).map(PathBuf::from).or(options.config_path);
        let config_directory = ports
            .env
            .get(&directory_var)
            .map(PathBuf::from)
            .or(options.config_directory);
        let config_name = ports.env.get(&name_var).unwrap_or(options.config_name);

        let commands = options
            .commands
            .instantiate(enable_config_ids)
            .into_iter()
            .map(|(names, command)| CommandEntry { names, command })
            .collect();

        Self {
            registry,
            commands,
            notifier: UiNotifier::new(options.notification_level),
            context: SourceContext::default(),
            config_id: None,
            enable_config_ids,
            check_config_id: options.check_config_id,
            env_prefix,
            env_variables: vec![path_var, directory_var, name_var],
            config_path,
            config_directory,
            config_name,
            help_width: options.help_width,
            fs: ports.fs,
            env: ports.env,
            dirs: ports.dirs,
        }
    }

    // ------- accessors -------

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    pub fn config_ids_enabled(&self) -> bool {
        self.enable_config_ids
    }

    /// The group of the line being read, `None` for the default group
    pub fn config_id(&self) -> Option<&ConfigId> {
        self.config_id.as_ref()
    }

    pub fn set_config_id(&mut self, config_id: Option<ConfigId>) {
        self.config_id = config_id;
    }

    /// Prefix of the environment variables of the settings
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Environment variables which change where the config file is looked for
    pub fn reserved_env_variables(&self) -> &[String] {
        &self.env_variables
    }

    /// Name of the file being read, if any
    pub fn context_file_name(&self) -> Option<&str> {
        self.context.file_name.as_deref()
    }

    /// Names of every command, primary name first
    pub fn command_names(&self) -> impl Iterator<Item = &[String]> {
        self.commands.iter().map(|c| c.names.as_slice())
    }

    pub(crate) fn get_command(&self, name: &str) -> Rc<dyn Command> {
        let find = |name: &str| {
            self.commands
                .iter()
                .find(|c| c.names.iter().any(|n| n == name))
                .map(|c| Rc::clone(&c.command))
        };
        find(name)
            .or_else(|| find(DEFAULT_COMMAND))
            .unwrap_or_else(|| Rc::new(UnknownCommand))
    }

    // ------- notifications -------

    /// Receive every message, including those from before this call
    pub fn set_ui_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Message) + 'static,
    {
        self.notifier.set_ui_callback(Box::new(callback));
    }

    pub fn notifier(&self) -> &UiNotifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut UiNotifier {
        &mut self.notifier
    }

    /// Report a change, attributed to the line being read
    pub fn show_info(&mut self, msg: impl Into<String>) {
        self.notifier.show_info(msg, &self.context, false);
    }

    /// Report an error, attributed to the line being read
    pub fn show_error(&mut self, msg: impl Into<String>) {
        self.notifier.show_error(msg, &self.context, false);
    }

    // ------- values -------

    /// Expand environment variables and references to other settings
    pub fn expand(&self, text: &str) -> Result<String, ParseError> {
        crate::expand::expand(text, &self.registry, self.env.as_ref())
    }

    /// Convert `text` to a value of `setting`, expanding it first unless `raw`
    pub fn parse_value(&self, setting: &Setting, text: &str, raw: bool) -> Result<Value, ParseError> {
        let text = if raw {
            text.to_string()
        } else {
            self.expand(text)?
        };
        Ok(setting.parse(&text)?)
    }

    /// Environment variable name of a setting: upper case, spaces, dots and
    /// hyphens replaced by underscores, prefixed with the application name
    pub fn get_env_name(&self, key: &str) -> String {
        env_name(&self.env_prefix, key)
    }

    // ------- paths -------

    /// Directories searched for the config file, user specific first
    pub fn config_directories(&self) -> Vec<PathBuf> {
        if let Some(directory) = &self.config_directory {
            return vec![directory.clone()];
        }
        let mut out = self.dirs.user_config_dirs();
        out.extend(self.dirs.site_config_dirs());
        out
    }

    /// Candidates for the config file, the first existing one is loaded
    pub fn config_paths(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.config_path {
            return vec![path.clone()];
        }
        self.config_directories()
            .into_iter()
            .map(|d| d.join(&self.config_name))
            .collect()
    }

    /// The first existing and writable candidate, else the first candidate
    pub fn save_path(&self) -> Option<PathBuf> {
        let paths = self.config_paths();
        paths
            .iter()
            .find(|p| self.fs.is_writable_file(p))
            .or_else(|| paths.first())
            .cloned()
    }

    /// Relative include paths are resolved against this directory
    pub(crate) fn include_base_dir(&self) -> PathBuf {
        let current = self
            .context_file_name()
            .filter(|name| *name != Message::ENVIRONMENT_VARIABLES)
            .map(PathBuf::from)
            .or_else(|| self.save_path());
        current
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    // ------- help -------

    pub fn create_formatter(&self) -> HelpFormatter {
        HelpFormatter::new(self.help_width)
    }

    pub fn help_config_id(&self) -> &'static str {
        Self::HELP_CONFIG_ID
    }

    /// Start a group in a saved file
    pub fn write_config_id(&self, writer: &mut dyn FormattedWriter, config_id: &ConfigId) -> io::Result<()> {
        writer.write_command(&format!("{ENTER_GROUP_PREFIX}{config_id}{ENTER_GROUP_SUFFIX}"))
    }

    /// Where the config file is looked for, how to use environment variables
    /// and the help of every command
    pub fn write_help(&self, writer: &mut dyn FormattedWriter) -> io::Result<()> {
        let formatter = self.create_formatter();
        writer.write_lines("The first existing file of the following paths is loaded:")?;
        for path in self.config_paths() {
            writer.write_line(&format!("- {}", path.display()))?;
        }

        writer.write_line("")?;
        writer.write_line("This can be influenced with the following environment variables:")?;
        for var in self.dirs.influencing_variables() {
            writer.write_line(&format!("- {var}"))?;
        }
        for var in &self.env_variables {
            writer.write_line(&format!("- {var}"))?;
        }

        writer.write_line("")?;
        writer.write_lines(&formatter.format_text(&format!(
            "You can also use environment variables to change the values of the settings listed under `set` command.
The corresponding environment variable name is the name of the setting in all upper case letters
with dots, hypens and spaces replaced by underscores and prefixed with \"{}\".",
            self.env_prefix
        )))?;

        let prefixes: Vec<String> = COMMENT_PREFIXES.iter().map(|c| format!("`{c}`")).collect();
        writer.write_lines(&formatter.format_text(&format!(
            "Lines in the config file which start with a {} are ignored.",
            prefixes.join(" or ")
        )))?;

        writer.write_lines("The config file may contain the following commands:")?;
        for entry in &self.commands {
            writer.write_heading(SectionLevel::Section, &entry.names.join("|"))?;
            writer.write_lines(&entry.command.help(self))?;
        }
        Ok(())
    }

    /// [`ConfigFile::write_help`] as a string without trailing newline
    pub fn get_help(&self) -> io::Result<String> {
        let mut writer = HelpWriter::new(Vec::new());
        self.write_help(&mut writer)?;
        let help = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        Ok(help.trim_end_matches('\n').to_string())
    }
}

fn env_name(prefix: &str, key: &str) -> String {
    let name: String = key
        .to_uppercase()
        .chars()
        .map(|c| if matches!(c, ' ' | '.' | '-') { '_' } else { c })
        .collect();
    format!("{prefix}{name}")
}

fn is_comment(line: &str) -> bool {
    COMMENT_PREFIXES.iter().any(|p| line.starts_with(p))
}
