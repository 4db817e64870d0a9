//! Error types for Confline
//!
//! Two families live here. [`ConfigError`] covers failures that abort the
//! whole operation: mistakes in the settings declarations, environment name
//! collisions and I/O failures while saving. [`ParseError`] covers everything
//! a user can get wrong in a single line of a config file; those are always
//! reported through the notifier and never escape line processing.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ports::FsError;

/// Result type alias for setup and I/O level operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Non-recoverable errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two settings were declared with the same key
    #[error("duplicate config key '{0}'")]
    DuplicateKey(String),

    /// A numeric setting was declared without a unit
    #[error("missing unit for {0}, pass an empty string if the number really has no unit")]
    MissingUnit(String),

    /// The item type of a list setting cannot be derived from an empty default
    #[error("cannot infer the item type of {0} from an empty list")]
    EmptyListDefault(String),

    /// The allowed values of a setting do not match its type
    #[error("allowed value {value} does not match the type of {key}")]
    AllowedValueType { key: String, value: String },

    /// Two command types claim the same name
    #[error("duplicate command name '{0}'")]
    DuplicateCommand(String),

    /// A command descriptor has neither a name nor a parent to inherit one from
    #[error("command descriptor has no name and does not replace another command")]
    UnnamedCommand,

    /// A descriptor replaces a command type which is not registered
    #[error("cannot replace unknown command '{0}'")]
    UnknownParentCommand(String),

    /// A setting maps to one of the reserved environment variables
    #[error("setting '{key}' conflicts with environment variable '{name}'")]
    ReservedEnvName { key: String, name: String },

    /// Two settings map to the same environment variable
    #[error("settings '{first}' and '{second}' result in the same environment variable '{name}'")]
    EnvNameCollision {
        first: String,
        second: String,
        name: String,
    },

    /// A typed accessor refers to a key which is not registered
    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    /// A typed accessor found a value of a different type
    #[error("config key '{key}' does not hold a {expected} value")]
    TypeMismatch { key: String, expected: String },

    /// A value cannot be stored under a key which a DictConfig keeps outside the registry
    #[error("cannot set value of ignored key '{0}'")]
    IgnoredKey(String),

    /// A value was rejected when set programmatically
    #[error(transparent)]
    Rejected(#[from] ParseError),

    /// There is no candidate path to save the config file to
    #[error("no config file path available")]
    NoSavePath,

    /// The schema file of the command line tool is invalid
    #[error("invalid schema {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    /// File system port error
    #[error(transparent)]
    Fs(#[from] FsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A value which cannot be converted to the type of a setting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for {key}: '{value}' ({reason})")]
pub struct ValueError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl ValueError {
    pub fn new(key: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// A recoverable error in one line of input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error(transparent)]
    InvalidValue(#[from] ValueError),

    /// The tokenizer could not split the line
    #[error("{0}")]
    Syntax(String),

    #[error("no settings given")]
    NoSettings,

    #[error("separator between key and value should be =, not '{0}'")]
    BadSeparator(String),

    #[error("missing value or missing =")]
    MissingValue,

    #[error("too many arguments given or missing = in first argument")]
    TooManyArguments,

    #[error("missing = in '{0}'")]
    MissingSeparator(String),

    #[error("uneven number of percent characters, use %% for a literal percent sign or --raw if you don't want expansion")]
    UnevenPercent,

    #[error("invalid conversion '{0}'")]
    InvalidConversion(String),

    #[error("invalid format spec '{spec}' for {key}: {reason}")]
    InvalidFormatSpec {
        key: String,
        spec: String,
        reason: String,
    },

    /// `${NAME?message}` on an unset variable
    #[error("{0}")]
    EnvUnset(String),

    #[error("circular include of file '{}'", .0.display())]
    CircularInclude(PathBuf),

    #[error("no such file '{}'", .0.display())]
    NoSuchFile(PathBuf),

    #[error("failed to read '{}': {reason}", path.display())]
    IncludeRead { path: PathBuf, reason: String },

    /// Argument errors reported by argument-aware commands
    #[error("{0}")]
    Arguments(String),

    #[error("{key} cannot be set for specific groups, config id must be the default '{default}' not '{config_id}'")]
    NotMulti {
        key: String,
        config_id: String,
        default: String,
    },

    /// Raised by config id checks
    #[error("{0}")]
    Rejected(String),
}

/// The error side of running a command: one error or several for the same line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error(transparent)]
    One(#[from] ParseError),

    #[error("{}", join_messages(.0))]
    Many(Vec<ParseError>),
}

impl LineError {
    /// Flatten into the individual errors, in the order they occurred
    pub fn into_errors(self) -> Vec<ParseError> {
        match self {
            LineError::One(err) => vec![err],
            LineError::Many(errs) => errs,
        }
    }
}

fn join_messages(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
