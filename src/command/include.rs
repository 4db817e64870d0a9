//! The `include` command

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgGroup, ArgMatches};
use tracing::debug;

use crate::complete::{file_name_completions, CompletionRequest, Completions};
use crate::engine::ConfigFile;
use crate::error::{LineError, ParseError};
use crate::help::HelpFormatter;

use super::{ArgParser, Command, CommandDescriptor, CommandInit};

const DESCRIPTION: &str = "Load another config file.

This is useful if a config file is getting so big that you want to split it up
or if you want to have different config files for different use cases which all include the same standard config file to avoid redundancy
or if you want to bind several commands to one key which executes one command with ConfigFile::parse_line().";

const HELP_PATH: &str = "The config file to load. Slashes are replaced with the directory separator appropriate for the current operating system. \
If the path is relative it is treated relative to the directory of the config file in which the include command is written.";

const ARG_PATH: &str = "path";
const ARG_RESET_BEFORE: &str = "reset-config-id-before";
const ARG_NO_RESET_AFTER: &str = "no-reset-config-id-after";

/// What happens to the active config id around the included file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigIdPolicy {
    /// The included file starts with the current id, which is restored afterwards
    Restore,
    /// The included file starts with the default id, the current one is restored afterwards
    ResetBefore,
    /// The id active at the end of the included file stays active
    Keep,
}

/// Loads another config file in place of the line
#[derive(Debug)]
pub struct Include {
    parser: ArgParser,
    enable_config_ids: bool,
    /// Files currently being included, innermost last
    nested: RefCell<Vec<PathBuf>>,
}

impl Include {
    pub fn new(init: &CommandInit<'_>) -> Self {
        let mut parser = ArgParser::new(init.name, DESCRIPTION).arg(Arg::new(ARG_PATH).required(true).help(HELP_PATH));
        if init.enable_config_ids {
            parser = parser
                .extend_description(ConfigFile::HELP_CONFIG_ID)
                .arg(
                    Arg::new(ARG_RESET_BEFORE)
                        .long(ARG_RESET_BEFORE)
                        .action(ArgAction::SetTrue)
                        .help("Ignore any config id which might be active when starting the include"),
                )
                .arg(
                    Arg::new(ARG_NO_RESET_AFTER)
                        .long(ARG_NO_RESET_AFTER)
                        .action(ArgAction::SetTrue)
                        .help("Treat the included lines as if they were written in the same config file instead of the include command"),
                )
                .group(ArgGroup::new("config-id").args([ARG_RESET_BEFORE, ARG_NO_RESET_AFTER]).multiple(false));
        }

        Self {
            parser,
            enable_config_ids: init.enable_config_ids,
            nested: RefCell::new(Vec::new()),
        }
    }

    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("include")
    }

    fn policy(&self, matches: &ArgMatches) -> ConfigIdPolicy {
        if !self.enable_config_ids {
            ConfigIdPolicy::Restore
        } else if matches.get_flag(ARG_NO_RESET_AFTER) {
            ConfigIdPolicy::Keep
        } else if matches.get_flag(ARG_RESET_BEFORE) {
            ConfigIdPolicy::ResetBefore
        } else {
            ConfigIdPolicy::Restore
        }
    }

    fn include(&self, path: PathBuf, policy: ConfigIdPolicy, config_file: &mut ConfigFile) -> Result<(), ParseError> {
        if self.nested.borrow().contains(&path) {
            return Err(ParseError::CircularInclude(path));
        }
        if !config_file.file_system().is_file(&path) {
            return Err(ParseError::NoSuchFile(path));
        }

        debug!(path = %path.display(), ?policy, "including config file");
        self.nested.borrow_mut().push(path.clone());
        let result = match policy {
            ConfigIdPolicy::Keep => config_file.load_without_resetting_config_id(&path),
            ConfigIdPolicy::ResetBefore => {
                let config_id = config_file.config_id().cloned();
                let result = config_file.load_file(&path);
                config_file.set_config_id(config_id);
                result
            }
            ConfigIdPolicy::Restore => {
                let config_id = config_file.config_id().cloned();
                let result = config_file.load_without_resetting_config_id(&path);
                config_file.set_config_id(config_id);
                result
            }
        };
        self.nested.borrow_mut().pop();

        result.map_err(|err| ParseError::IncludeRead {
            path,
            reason: err.to_string(),
        })
    }
}

/// `path` with `/` as separator, `~` expanded and relative paths resolved
/// against `base`, without touching the file system
pub(crate) fn resolve_path(config_file: &ConfigFile, path: &str, base: &Path) -> PathBuf {
    let path = path.replace('/', std::path::MAIN_SEPARATOR_STR);
    let path = config_file.file_system().expand_home(Path::new(&path));
    let path = if path.is_absolute() { path } else { base.join(path) };
    normalize(&path)
}

/// Remove `.` and resolve `..` lexically
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

impl Command for Include {
    fn run(&self, args: &[String], config_file: &mut ConfigFile) -> Result<(), LineError> {
        let matches = self.parser.parse(args.get(1..).unwrap_or_default())?;
        let path = matches
            .get_one::<String>(ARG_PATH)
            .cloned()
            .unwrap_or_default();
        let policy = self.policy(&matches);

        let base = config_file.include_base_dir();
        let path = resolve_path(config_file, &path, &base);
        Ok(self.include(path, policy, config_file)?)
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn add_help_to(&self, formatter: &mut HelpFormatter, _config_file: &ConfigFile) {
        formatter.add_text(&self.parser.help());
    }

    fn help(&self, _config_file: &ConfigFile) -> String {
        self.parser.help()
    }

    fn completions(&self, request: CompletionRequest<'_>, config_file: &ConfigFile) -> Completions {
        self.parser.completions(request, |arg, start, request| {
            if arg.get_id() != ARG_PATH {
                return Err(request);
            }
            let Some(save_path) = config_file.save_path() else {
                return Ok(request.nothing());
            };
            let directory = save_path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok(file_name_completions(config_file.file_system(), start, &directory, request))
        })
    }
}
