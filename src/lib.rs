//! Confline - typed settings with a line-oriented config file language
//!
//! Applications declare their settings in a [`Registry`] and hand it to a
//! [`ConfigFile`], which loads and saves config files made of commands like
//! `set key = value` and `include other-file`, reads environment variables,
//! expands `%setting%` and `${ENV}` references, and completes partially typed
//! lines for interactive editors.

pub mod command;
pub mod complete;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod expand;
pub mod help;
pub mod infrastructure;
pub mod notify;
pub mod parser;
pub mod schema;

// Re-exports for convenience
pub use command::{Command, CommandDescriptor, CommandRegistry};
pub use complete::Completions;
pub use config::{ConfigId, DictConfig, Registry, SettingHandle, Value};
pub use engine::{ConfigFile, ConfigFileOptions, Ports, SaveOptions};
pub use error::{ConfigError, ConfigResult, LineError, ParseError, ValueError};
pub use notify::{Message, NotificationLevel};
pub use parser::{quote, split_line};
pub use schema::Schema;
