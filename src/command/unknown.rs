//! Fallback for lines whose first argument is not a command name

use crate::engine::ConfigFile;
use crate::error::{LineError, ParseError};

use super::Command;

/// Reports an unknown command.
///
/// Used when no command type owns the [`DEFAULT_COMMAND`] name.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownCommand;

impl Command for UnknownCommand {
    fn run(&self, args: &[String], _config_file: &mut ConfigFile) -> Result<(), LineError> {
        let name = args.first().cloned().unwrap_or_default();
        Err(ParseError::UnknownCommand(name).into())
    }
}
