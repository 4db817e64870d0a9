//! The `set` command
//!
//! Two line syntaxes share this verb:
//!
//! - `set [--raw] key1=val1 [key2=val2 ...]` sets any number of settings,
//!   errors of the individual assignments are collected
//! - `set [--raw] key [=] val` sets exactly one setting
//!
//! Which one applies depends only on whether the first argument after the
//! optional raw flag contains `=`.

use std::collections::BTreeMap;
use std::io;

use crate::complete::{CompletionRequest, Completions};
use crate::config::{ConfigId, Help, Registry, Setting, ValueKind};
use crate::domain::ports::{FormattedWriter, SectionLevel};
use crate::engine::{ConfigFile, SaveOptions};
use crate::error::{LineError, ParseError};
use crate::help::{strip_indentation, HelpFormatter};
use crate::parser::quote;

use super::{Command, CommandDescriptor, CommandInit};

const KEY_VAL_SEP: char = '=';

const FLAGS_RAW: [&str; 2] = ["-r", "--raw"];

const DESCRIPTION: &str = r"
usage: set [--raw] key1=val1 [key2=val2 ...] \
       set [--raw] key [=] val

Change the value of a setting.

In the first form set takes an arbitrary number of arguments, each argument sets one setting.
This has the advantage that several settings can be changed at once.
That is useful if you want to bind a set command to a key and process that command with ConfigFile::parse_line() if the key is pressed.

In the second form set takes two arguments, the key and the value. Optionally a single equals character may be added in between as third argument.
This has the advantage that key and value are separated by one or more spaces which can improve the readability of a config file.

You can use the value of another setting with %other.key% or an environment variable with ${ENV_VAR}.
If you want to insert a literal percent character use two of them: %%.
You can disable expansion of settings and environment variables with the --raw flag.
";

/// Changes settings, writes every exported setting when saving
#[derive(Debug, Clone)]
pub struct Set {
    name: String,
}

impl Default for Set {
    fn default() -> Self {
        Self { name: "set".to_string() }
    }
}

impl Set {
    pub fn new(init: &CommandInit<'_>) -> Self {
        Self {
            name: init.name.to_string(),
        }
    }

    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("set")
    }

    // ------- load -------

    fn set_with_spaces(&self, args: &[String], config_file: &mut ConfigFile) -> Result<(), ParseError> {
        let (raw, rest) = match args.get(1) {
            Some(flag) if is_raw_flag(flag) => (true, &args[2..]),
            _ => (false, args.get(1..).unwrap_or_default()),
        };

        match rest {
            [key, value] => parse_key_and_set_value(config_file, key, value, raw),
            [key, sep, value] => {
                if sep.chars().eq([KEY_VAL_SEP]) {
                    parse_key_and_set_value(config_file, key, value, raw)
                } else {
                    Err(ParseError::BadSeparator(sep.clone()))
                }
            }
            [_] => Err(ParseError::MissingValue),
            _ => Err(ParseError::TooManyArguments),
        }
    }

    fn set_multiple(&self, args: &[String], config_file: &mut ConfigFile) -> Result<(), LineError> {
        // the flag applies to the assignments following it
        let mut raw = false;
        let mut errors = Vec::new();
        for arg in args.iter().skip(1) {
            if is_raw_flag(arg) {
                raw = true;
                continue;
            }
            let result = match arg.split_once(KEY_VAL_SEP) {
                Some((key, value)) => parse_key_and_set_value(config_file, key, value, raw),
                None => Err(ParseError::MissingSeparator(arg.clone())),
            };
            if let Err(err) = result {
                errors.push(err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LineError::Many(errors))
        }
    }

    // ------- save -------

    fn save_setting(
        &self,
        writer: &mut dyn FormattedWriter,
        config_file: &ConfigFile,
        setting: &Setting,
        config_id: Option<&ConfigId>,
        comments: bool,
        last_name: &mut Option<String>,
    ) -> io::Result<()> {
        if comments {
            write_setting_help(writer, config_file, setting, last_name)?;
        }
        let value = setting.format_value(config_id);
        // values which look like references must not be expanded when loading
        let raw = if value.contains('%') || value.contains("${") {
            "--raw "
        } else {
            ""
        };
        writer.write_command(&format!("{} {raw}{} = {}", self.name, setting.key(), quote(&value)))
    }
}

fn is_raw_flag(arg: &str) -> bool {
    FLAGS_RAW.contains(&arg)
}

/// `true` for `set key=value ...`, `false` for `set key [=] value`
fn is_vim_style(args: &[String]) -> Result<bool, ParseError> {
    let i = match args.get(1) {
        Some(flag) if is_raw_flag(flag) => 2,
        _ => 1,
    };
    args.get(i)
        .map(|arg| arg.contains(KEY_VAL_SEP))
        .ok_or(ParseError::NoSettings)
}

fn parse_key_and_set_value(config_file: &mut ConfigFile, key: &str, value: &str, raw: bool) -> Result<(), ParseError> {
    if !config_file.registry().contains(key) {
        return Err(ParseError::InvalidKey(key.to_string()));
    }
    let text = if raw {
        value.to_string()
    } else {
        config_file.expand(value)?
    };
    let parsed = config_file
        .registry()
        .get(key)
        .ok_or_else(|| ParseError::InvalidKey(key.to_string()))?
        .parse(&text)?;

    let config_id = config_file.config_id().cloned();
    config_file
        .registry_mut()
        .set_value(key, config_id.as_ref(), parsed)?;
    let formatted = config_file
        .registry()
        .format_value(key, config_id.as_ref())
        .unwrap_or_default();
    config_file.show_info(format!("set {key} to {formatted}"));
    Ok(())
}

/// Settings to save or document, DictConfig prefixes in `keys` and `ignore`
/// stand for all of their members
fn settings_to_save<'r>(registry: &'r Registry, options: &SaveOptions) -> Vec<&'r Setting> {
    let selected: Vec<&Setting> = match &options.keys {
        None => registry.settings().collect(),
        Some(keys) => keys
            .iter()
            .flat_map(|key| match registry.get(key) {
                Some(setting) => vec![setting],
                None => registry
                    .settings()
                    .filter(|s| s.parent() == Some(key.as_str()))
                    .collect(),
            })
            .collect(),
    };

    selected
        .into_iter()
        .filter(|s| s.is_exported())
        .filter(|s| {
            !options.ignore.contains(s.key()) && !s.parent().is_some_and(|p| options.ignore.contains(p))
        })
        .collect()
}

fn split_multi<'r>(settings: Vec<&'r Setting>, separate: bool) -> (Vec<&'r Setting>, Vec<&'r Setting>) {
    if separate {
        settings.into_iter().partition(|s| !s.is_multi())
    } else {
        (settings, Vec::new())
    }
}

/// Help for the types of `settings`, sorted by type name.
/// Enums and bools need none.
fn data_type_help(settings: &[&Setting]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for setting in settings {
        let kind = setting.kind().item_kind();
        if let Some(help) = kind.type_help() {
            out.entry(kind.type_name()).or_insert_with(|| strip_indentation(help));
        }
    }
    out
}

fn add_data_type_help(formatter: &mut HelpFormatter, settings: &[&Setting]) {
    for (name, help) in data_type_help(settings) {
        formatter.add_start_section(&name);
        formatter.add_text(&help);
        formatter.add_end_section();
    }
}

fn write_data_type_help(
    writer: &mut dyn FormattedWriter,
    config_file: &ConfigFile,
    settings: &[&Setting],
) -> io::Result<()> {
    let mut formatter = config_file.create_formatter();
    add_data_type_help(&mut formatter, settings);
    let help = formatter.format_help();
    let help = help.trim_end_matches('\n');
    if help.is_empty() {
        return Ok(());
    }
    writer.write_heading(SectionLevel::SubSection, "Data types")?;
    writer.write_lines(help)
}

/// Comment explaining a setting, written once for all members of a DictConfig
fn write_setting_help(
    writer: &mut dyn FormattedWriter,
    config_file: &ConfigFile,
    setting: &Setting,
    last_name: &mut Option<String>,
) -> io::Result<()> {
    let name = setting.parent().unwrap_or(setting.key());
    if last_name.as_deref() == Some(name) {
        return Ok(());
    }

    let formatter = config_file.create_formatter();
    writer.write_heading(SectionLevel::SubSection, name)?;
    writer.write_lines(formatter.format_text(&setting.format_allowed_values_or_type()).trim_end())?;
    match setting.help() {
        Some(Help::PerValue(items)) => {
            for (value, text) in items {
                let bullet = format!("{}: ", setting.format(value));
                writer.write_lines(formatter.format_item(&bullet, text).trim_end())?;
            }
        }
        Some(Help::Text(text)) => writer.write_lines(formatter.format_text(text).trim_end())?,
        None => {}
    }

    *last_name = Some(name.to_string());
    Ok(())
}

fn add_setting_help(formatter: &mut HelpFormatter, setting: &Setting) {
    formatter.add_start_section(setting.key());
    formatter.add_text(&setting.format_allowed_values_or_type());
    match setting.help() {
        Some(Help::PerValue(items)) => {
            for (value, text) in items {
                formatter.add_item(&format!("{}: ", setting.format(value)), text);
            }
        }
        Some(Help::Text(text)) => formatter.add_text(text),
        None => {}
    }
    formatter.add_end_section();
}

// ------- completion -------

fn complete_key(config_file: &ConfigFile, start: &str, request: CompletionRequest<'_>) -> Completions {
    let keys = config_file
        .registry()
        .keys()
        .filter(|k| k.starts_with(start))
        .map(str::to_string)
        .collect();
    request.reply(keys)
}

fn complete_value(config_file: &ConfigFile, key: &str, start: &str, request: CompletionRequest<'_>) -> Completions {
    let Some(setting) = config_file.registry().get(key) else {
        return request.nothing();
    };

    let (request, start, kind) = match setting.kind() {
        ValueKind::List(item) => match start.rsplit_once(setting.list_separator()) {
            Some((done, last)) => {
                let kept = format!("{done}{}", setting.list_separator());
                (request.keep(&kept), last, item.as_ref())
            }
            None => (request, start, item.as_ref()),
        },
        kind => (request, start, kind),
    };

    let candidates = setting
        .allowed_value_strings(kind)
        .into_iter()
        .filter(|v| v.starts_with(start))
        .map(|v| quote(&v))
        .collect();
    request.reply(candidates)
}

impl Command for Set {
    fn run(&self, args: &[String], config_file: &mut ConfigFile) -> Result<(), LineError> {
        if is_vim_style(args)? {
            self.set_multiple(args, config_file)
        } else {
            Ok(self.set_with_spaces(args, config_file)?)
        }
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn add_help_to(&self, formatter: &mut HelpFormatter, config_file: &ConfigFile) {
        formatter.add_text(self.description());

        let settings = settings_to_save(config_file.registry(), &SaveOptions::default());
        formatter.add_start_section("data types");
        add_data_type_help(formatter, &settings);
        formatter.add_end_section();

        let enabled = config_file.config_ids_enabled();
        let (normal, multi) = split_multi(settings, enabled);

        if !normal.is_empty() {
            formatter.add_start_section(if enabled {
                "application wide settings"
            } else {
                "settings"
            });
            for setting in &normal {
                add_setting_help(formatter, setting);
            }
            formatter.add_end_section();
        }

        if !multi.is_empty() {
            formatter.add_start_section("settings which can have different values for different objects");
            formatter.add_text(config_file.help_config_id());
            for setting in &multi {
                add_setting_help(formatter, setting);
            }
            formatter.add_end_section();
        }
    }

    fn implements_save(&self) -> bool {
        true
    }

    fn save(
        &self,
        writer: &mut dyn FormattedWriter,
        config_file: &ConfigFile,
        options: &SaveOptions,
        write_heading: bool,
    ) -> io::Result<()> {
        let no_multi = options.no_multi.unwrap_or(!config_file.config_ids_enabled());
        let settings = settings_to_save(config_file.registry(), options);
        let (normal, multi) = split_multi(settings, !no_multi);
        let mut last_name = None;

        if !normal.is_empty() {
            if !multi.is_empty() {
                writer.write_heading(SectionLevel::Section, "Application wide settings")?;
            } else if write_heading {
                writer.write_heading(SectionLevel::Section, "Settings")?;
            }
            if options.comments {
                write_data_type_help(writer, config_file, &normal)?;
            }
            for setting in &normal {
                self.save_setting(writer, config_file, setting, None, options.comments, &mut last_name)?;
            }
        }

        if !multi.is_empty() {
            if !normal.is_empty() {
                writer.write_heading(
                    SectionLevel::Section,
                    "Settings which can have different values for different objects",
                )?;
            } else if write_heading {
                writer.write_heading(SectionLevel::Section, "Settings")?;
            }
            if options.comments {
                write_data_type_help(writer, config_file, &multi)?;
            }

            let default_id = ConfigId::default();
            for setting in &multi {
                self.save_setting(writer, config_file, setting, Some(&default_id), options.comments, &mut last_name)?;
            }
            for config_id in config_file.registry().config_ids() {
                writer.write_line("")?;
                config_file.write_config_id(writer, config_id)?;
                for setting in &multi {
                    self.save_setting(writer, config_file, setting, Some(config_id), options.comments, &mut last_name)?;
                }
            }
        }
        Ok(())
    }

    fn completions(&self, request: CompletionRequest<'_>, config_file: &ConfigFile) -> Completions {
        let start = request.start();
        let args = request.args;

        match is_vim_style(args) {
            Ok(true) => match start.split_once(KEY_VAL_SEP) {
                Some((key, value)) => {
                    let request = request.keep(&format!("{key}{KEY_VAL_SEP}"));
                    complete_value(config_file, key, value, request)
                }
                None => complete_key(config_file, start, request),
            },
            Ok(false) => {
                let offset = usize::from(args.get(1).is_some_and(|a| is_raw_flag(a)));
                let pos = request.argument_pos.saturating_sub(offset);
                let key = args.get(1 + offset).map(String::as_str).unwrap_or_default();
                let has_sep = args.get(2 + offset).is_some_and(|a| a.chars().eq([KEY_VAL_SEP]));
                match pos {
                    1 => complete_key(config_file, start, request),
                    2 => complete_value(config_file, key, start, request),
                    3 if has_sep => complete_value(config_file, key, start, request),
                    _ => request.nothing(),
                }
            }
            Err(_) => complete_key(config_file, start, request),
        }
    }
}
