//! Loading config files and environment variables

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::ConfigId;
use crate::error::{ConfigError, ConfigResult, ParseError};
use crate::notify::{Message, SourceContext};
use crate::parser::split_line;

use super::{is_comment, ConfigFile, ENTER_GROUP_PREFIX, ENTER_GROUP_SUFFIX};

impl ConfigFile {
    /// Load the first existing config file, then the environment variables if `env` is set.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or if the environment variable names
    /// of two settings collide, see [`ConfigFile::load_env`]. Errors in the
    /// file are reported through the notifier.
    pub fn load(&mut self, env: bool) -> ConfigResult<()> {
        let path = self.config_paths().into_iter().find(|p| self.fs.is_file(p));
        match path {
            Some(path) => self.load_file(&path)?,
            None => debug!("no config file found"),
        }
        if env {
            self.load_env()?;
        }
        Ok(())
    }

    /// Load a config file, starting in the default group
    pub fn load_file(&mut self, path: &Path) -> ConfigResult<()> {
        self.config_id = None;
        self.load_without_resetting_config_id(path)
    }

    /// Load a config file, starting in the group which is currently active
    pub fn load_without_resetting_config_id(&mut self, path: &Path) -> ConfigResult<()> {
        let content = self.fs.read(path)?;
        debug!(path = %path.display(), "loading config file");

        let saved = std::mem::replace(
            &mut self.context,
            SourceContext {
                file_name: Some(path.display().to_string()),
                ..SourceContext::default()
            },
        );
        for (i, line) in content.lines().enumerate() {
            self.context.line_number = Some(i + 1);
            self.parse_line(line);
        }
        self.context = saved;
        Ok(())
    }

    /// Process one line. Returns false if an error was reported.
    pub fn parse_line(&mut self, line: &str) -> bool {
        let ln = line.trim();
        if ln.is_empty() || is_comment(ln) {
            return true;
        }
        if self.enable_config_ids && self.enter_group(ln) {
            return true;
        }

        self.context.line = ln.to_string();
        let out = match split_line(ln) {
            Ok(args) if args.is_empty() => true,
            Ok(args) => self.run_command(&args),
            Err(err) => {
                self.parse_error(&err);
                false
            }
        };
        self.context.line.clear();
        out
    }

    fn run_command(&mut self, args: &[String]) -> bool {
        let command = self.get_command(&args[0]);
        match command.run(args, self) {
            Ok(()) => true,
            Err(err) => {
                for err in err.into_errors() {
                    self.parse_error(&err);
                }
                false
            }
        }
    }

    fn parse_error(&mut self, err: &ParseError) {
        self.show_error(err.to_string());
    }

    /// Switch the group if `line` is `[id]`
    fn enter_group(&mut self, line: &str) -> bool {
        let Some(id) = line
            .strip_prefix(ENTER_GROUP_PREFIX)
            .and_then(|l| l.strip_suffix(ENTER_GROUP_SUFFIX))
        else {
            return false;
        };

        let config_id = ConfigId::new(id);
        if !config_id.is_default() {
            if let Some(check) = self.check_config_id.clone() {
                if let Err(msg) = check(&config_id) {
                    self.context.line = line.to_string();
                    self.parse_error(&ParseError::Rejected(msg));
                    self.context.line.clear();
                }
            }
        }

        debug!(config_id = %config_id, "entering group");
        self.registry.add_config_id(config_id.clone());
        self.config_id = Some(config_id);
        true
    }

    /// Set settings from environment variables starting with the prefix.
    ///
    /// Unknown variables and invalid values are reported through the notifier.
    ///
    /// # Errors
    ///
    /// Fails if a setting maps to a reserved variable or two settings map
    /// to the same variable.
    pub fn load_env(&mut self) -> ConfigResult<()> {
        let names = self.env_names()?;

        let saved = std::mem::replace(
            &mut self.context,
            SourceContext {
                file_name: Some(Message::ENVIRONMENT_VARIABLES.to_string()),
                ..SourceContext::default()
            },
        );
        for (name, value) in self.env.vars() {
            if !name.starts_with(&self.env_prefix) || self.env_variables.contains(&name) {
                continue;
            }
            match names.get(&name) {
                Some(key) => {
                    if let Err(err) = self.set_from_env(key, &value) {
                        self.show_error(format!(
                            "{err} while trying to parse environment variable {name}='{value}'"
                        ));
                    }
                }
                None => self.show_error(format!("unknown environment variable {name}='{value}'")),
            }
        }
        self.context = saved;
        Ok(())
    }

    /// Environment variable name of every setting
    fn env_names(&self) -> ConfigResult<BTreeMap<String, String>> {
        let mut names: BTreeMap<String, String> = BTreeMap::new();
        for key in self.registry.keys() {
            let name = self.get_env_name(key);
            if self.env_variables.contains(&name) {
                return Err(ConfigError::ReservedEnvName {
                    key: key.to_string(),
                    name,
                });
            }
            if let Some(first) = names.get(&name) {
                return Err(ConfigError::EnvNameCollision {
                    first: first.clone(),
                    second: key.to_string(),
                    name,
                });
            }
            names.insert(name, key.to_string());
        }
        Ok(names)
    }

    fn set_from_env(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        let setting = self
            .registry
            .get(key)
            .ok_or_else(|| ParseError::InvalidKey(key.to_string()))?;
        let parsed = self.parse_value(setting, value, true)?;
        self.registry.set_value(key, None, parsed)?;
        let formatted = self.registry.format_value(key, None).unwrap_or_default();
        self.show_info(format!("set {key} to {formatted}"));
        Ok(())
    }
}
