//! Commands of the config file language
//!
//! The first argument of every line names a [`Command`]. Command types are
//! declared in a [`CommandRegistry`] and instantiated once per
//! [`ConfigFile`](crate::engine::ConfigFile).
//!
//! ```
//! use confline::command::{Command, CommandDescriptor, CommandRegistry};
//! use confline::engine::ConfigFile;
//! use confline::error::LineError;
//!
//! struct Echo;
//!
//! impl Command for Echo {
//!     fn run(&self, args: &[String], config_file: &mut ConfigFile) -> Result<(), LineError> {
//!         config_file.show_info(args[1..].join(" "));
//!         Ok(())
//!     }
//! }
//!
//! let mut commands = CommandRegistry::with_defaults();
//! commands
//!     .register(CommandDescriptor::named("echo"), |_| Box::new(Echo))
//!     .unwrap();
//! assert!(commands.names().any(|n| n == "echo"));
//! ```

mod args;
mod include;
mod set;
mod unknown;

use std::fmt;
use std::io;
use std::rc::Rc;

use crate::complete::{CompletionRequest, Completions};
use crate::domain::ports::FormattedWriter;
use crate::engine::{ConfigFile, SaveOptions};
use crate::error::{ConfigError, ConfigResult, LineError};
use crate::help::HelpFormatter;

pub use args::ArgParser;
pub use include::Include;
pub use set::Set;
pub use unknown::UnknownCommand;

/// The name of the command which runs lines starting with an undefined name
pub const DEFAULT_COMMAND: &str = "";

/// A verb of the config file language
pub trait Command {
    /// Process one line. `args[0]` is the name the command was called by.
    fn run(&self, args: &[String], config_file: &mut ConfigFile) -> Result<(), LineError>;

    /// Description for the help
    fn description(&self) -> &str {
        ""
    }

    fn add_help_to(&self, formatter: &mut HelpFormatter, _config_file: &ConfigFile) {
        formatter.add_text(self.description());
    }

    /// Help text without trailing newlines
    fn help(&self, config_file: &ConfigFile) -> String {
        let mut formatter = config_file.create_formatter();
        self.add_help_to(&mut formatter, config_file);
        formatter.format_help().trim_end_matches('\n').to_string()
    }

    /// Whether [`Command::save`] writes anything
    fn implements_save(&self) -> bool {
        false
    }

    /// Write the commands which recreate the current state.
    ///
    /// `write_heading` is set if several commands save, a command writing
    /// several sections writes their headings regardless.
    fn save(
        &self,
        _writer: &mut dyn FormattedWriter,
        _config_file: &ConfigFile,
        _options: &SaveOptions,
        _write_heading: bool,
    ) -> io::Result<()> {
        Ok(())
    }

    fn completions(&self, request: CompletionRequest<'_>, _config_file: &ConfigFile) -> Completions {
        request.nothing()
    }
}

/// Names and relations of a command type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Name used in config files, [`DEFAULT_COMMAND`] for the fallback command
    pub name: Option<String>,
    pub aliases: Option<Vec<String>>,
    /// Names of command types this one takes the place of
    pub replaces: Vec<String>,
    /// Only a template for other command types, never dispatched
    pub is_abstract: bool,
}

impl CommandDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A command type which inherits the names of `parent` unless given its own
    pub fn replacing(parent: impl Into<String>) -> Self {
        Self {
            replaces: vec![parent.into()],
            ..Self::default()
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// Passed to a command factory when a [`ConfigFile`] is created
#[derive(Debug, Clone, Copy)]
pub struct CommandInit<'a> {
    /// The primary name of the command
    pub name: &'a str,
    pub enable_config_ids: bool,
}

/// Creates the instance of a command type for one config file
pub type CommandFactory = Rc<dyn Fn(&CommandInit<'_>) -> Box<dyn Command>>;

/// Returned by [`CommandRegistry::register`], removes the command type again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandHandle(usize);

#[derive(Clone)]
struct CommandType {
    id: usize,
    names: Vec<String>,
    is_abstract: bool,
    factory: CommandFactory,
}

/// The command types available to config files
#[derive(Clone, Default)]
pub struct CommandRegistry {
    types: Vec<CommandType>,
    next_id: usize,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.types.iter().map(|t| &t.names))
            .finish()
    }
}

impl CommandRegistry {
    /// A registry without any command
    pub fn new() -> Self {
        Self::default()
    }

    /// `set` and `include`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // the names of the defaults are distinct
        let _ = registry.register(Set::descriptor(), |init| Box::new(Set::new(init)));
        let _ = registry.register(Include::descriptor(), |init| Box::new(Include::new(init)));
        registry
    }

    /// Declare a command type.
    ///
    /// # Errors
    ///
    /// Fails if a name is already taken, unless this type replaces another
    /// one, in which case command types with the same names are removed.
    pub fn register<F>(&mut self, descriptor: CommandDescriptor, factory: F) -> ConfigResult<CommandHandle>
    where
        F: Fn(&CommandInit<'_>) -> Box<dyn Command> + 'static,
    {
        self.register_factory(descriptor, Rc::new(factory))
    }

    fn register_factory(&mut self, descriptor: CommandDescriptor, factory: CommandFactory) -> ConfigResult<CommandHandle> {
        let parents = descriptor
            .replaces
            .iter()
            .map(|name| {
                self.find(name)
                    .ok_or_else(|| ConfigError::UnknownParentCommand(name.clone()))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        let parent_names: Vec<Vec<String>> = parents.iter().map(|&i| self.types[i].names.clone()).collect();

        let name = match (&descriptor.name, parent_names.first()) {
            (Some(name), _) => name.clone(),
            (None, Some(names)) => names[0].clone(),
            (None, None) => return Err(ConfigError::UnnamedCommand),
        };
        let aliases = match &descriptor.aliases {
            Some(aliases) => aliases.clone(),
            None => {
                let mut inherited: Vec<String> = parent_names
                    .first()
                    .map(|names| names[1..].to_vec())
                    .unwrap_or_default();
                for names in parent_names.iter().skip(1) {
                    inherited.extend(names.iter().cloned());
                }
                inherited
            }
        };
        let mut names = vec![name];
        names.extend(aliases);

        let replacing = !descriptor.replaces.is_empty();
        let parent_ids: Vec<usize> = parents.iter().map(|&i| self.types[i].id).collect();
        self.types.retain(|t| !parent_ids.contains(&t.id));

        if !descriptor.is_abstract {
            let taken = self
                .types
                .iter()
                .filter(|t| !t.is_abstract)
                .flat_map(|t| t.names.iter())
                .find(|n| names.contains(n));
            if let Some(taken) = taken {
                if !replacing {
                    return Err(ConfigError::DuplicateCommand(taken.clone()));
                }
                self.types
                    .retain(|t| t.is_abstract || !t.names.iter().any(|n| names.contains(n)));
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.types.push(CommandType {
            id,
            names,
            is_abstract: descriptor.is_abstract,
            factory,
        });
        Ok(CommandHandle(id))
    }

    /// Remove a command type, its names become available again.
    /// Returns false if it has already been removed.
    pub fn unregister(&mut self, handle: CommandHandle) -> bool {
        let before = self.types.len();
        self.types.retain(|t| t.id != handle.0);
        self.types.len() != before
    }

    /// Names of every dispatchable command type, primary name first
    pub fn command_types(&self) -> impl Iterator<Item = &[String]> {
        self.types
            .iter()
            .filter(|t| !t.is_abstract)
            .map(|t| t.names.as_slice())
    }

    /// Every name and alias of the dispatchable command types
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.command_types().flatten().map(String::as_str)
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|t| t.names.iter().any(|n| n == name))
    }

    pub(crate) fn instantiate(&self, enable_config_ids: bool) -> Vec<(Vec<String>, Rc<dyn Command>)> {
        self.types
            .iter()
            .filter(|t| !t.is_abstract)
            .map(|t| {
                let init = CommandInit {
                    name: &t.names[0],
                    enable_config_ids,
                };
                (t.names.clone(), Rc::from((t.factory)(&init)))
            })
            .collect()
    }
}
