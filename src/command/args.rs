//! Argument parsing for commands with options
//!
//! [`ArgParser`] wraps a `clap::Command` which never sees a binary name and
//! has no help or version flags. Parse failures become a [`ParseError`] with
//! the first line of clap's message.

use clap::{Arg, ArgGroup, ArgMatches};

use crate::complete::{CompletionRequest, Completions};
use crate::error::ParseError;
use crate::parser::quote;

/// Marks the end of options, everything behind it is positional
const END_OF_OPTIONS: &str = "--";

/// Parses the arguments of one command
#[derive(Debug, Clone)]
pub struct ArgParser {
    command: clap::Command,
}

impl ArgParser {
    pub fn new(name: &str, description: &str) -> Self {
        let command = clap::Command::new(name.to_string())
            .about(description.to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .help_template("usage: {usage}\n\n{about}\n\n{all-args}");
        Self { command }
    }

    pub fn arg(mut self, arg: Arg) -> Self {
        self.command = self.command.arg(arg);
        self
    }

    pub fn group(mut self, group: ArgGroup) -> Self {
        self.command = self.command.group(group);
        self
    }

    /// Append a paragraph to the description
    pub fn extend_description(mut self, text: &str) -> Self {
        let about = match self.command.get_about() {
            Some(about) => format!("{about}\n\n{text}"),
            None => text.to_string(),
        };
        self.command = self.command.about(about);
        self
    }

    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// Parse the arguments behind the command name
    pub fn parse(&self, args: &[String]) -> Result<ArgMatches, ParseError> {
        self.command
            .clone()
            .try_get_matches_from(args)
            .map_err(|err| ParseError::Arguments(first_line(&err.render().to_string())))
    }

    pub fn help(&self) -> String {
        self.command
            .clone()
            .render_help()
            .to_string()
            .trim_end_matches('\n')
            .to_string()
    }

    // ------- completion -------

    /// Complete option names, option values and positional arguments.
    ///
    /// `complete_value` gets the first chance to complete the value of an
    /// argument and returns the request back if it has nothing special to
    /// offer, in which case the possible values of the argument are used.
    pub fn completions<'a, F>(&self, request: CompletionRequest<'a>, complete_value: F) -> Completions
    where
        F: FnOnce(&Arg, &'a str, CompletionRequest<'a>) -> Result<Completions, CompletionRequest<'a>>,
    {
        let args = request.args;
        let pos = request.argument_pos;
        let start = request.start();

        if self.after_end_of_options(args, pos) {
            let arg = self.positional(self.position(args, pos));
            return self.complete_action(arg, start, request, complete_value);
        }

        if pos > 0 {
            if let Some(name) = self.option_taking_value(args, pos - 1) {
                let arg = self.option(&name);
                return self.complete_action(arg, start, request, complete_value);
            }
        }

        if is_option_start(start) {
            if let Some((name, value)) = start.split_once('=') {
                let request = request.keep(&start[..=name.len()]);
                let arg = self.option(name);
                return self.complete_action(arg, value, request, complete_value);
            }
            let names = self.option_names(start);
            return request.reply(names);
        }

        let arg = self.positional(self.position(args, pos));
        self.complete_action(arg, start, request, complete_value)
    }

    fn complete_action<'a, F>(
        &self,
        arg: Option<&Arg>,
        start: &'a str,
        request: CompletionRequest<'a>,
        complete_value: F,
    ) -> Completions
    where
        F: FnOnce(&Arg, &'a str, CompletionRequest<'a>) -> Result<Completions, CompletionRequest<'a>>,
    {
        let Some(arg) = arg else {
            return request.nothing();
        };
        let request = match complete_value(arg, start, request) {
            Ok(completions) => return completions,
            Err(request) => request,
        };
        let candidates = arg
            .get_possible_values()
            .iter()
            .map(|v| v.get_name())
            .filter(|v| v.starts_with(start))
            .map(quote)
            .collect();
        request.reply(candidates)
    }

    /// Long option names starting with `start`. Short flags are easy to type
    /// but don't explain themselves, so they are not offered.
    fn option_names(&self, start: &str) -> Vec<String> {
        self.command
            .get_arguments()
            .filter(|a| !a.is_positional())
            .flat_map(|a| {
                a.get_long_and_visible_aliases()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|long| format!("--{long}"))
            })
            .filter(|name| name.len() > 2 && name.starts_with(start))
            .collect()
    }

    fn option(&self, name: &str) -> Option<&Arg> {
        if let Some(long) = name.strip_prefix("--") {
            return self.command.get_arguments().find(|a| {
                a.get_long_and_visible_aliases()
                    .is_some_and(|names| names.contains(&long))
            });
        }
        let mut chars = name.strip_prefix('-')?.chars();
        let short = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.command
            .get_arguments()
            .find(|a| a.get_short_and_visible_aliases().is_some_and(|s| s.contains(&short)))
    }

    fn positional(&self, index: usize) -> Option<&Arg> {
        self.command.get_positionals().nth(index)
    }

    fn after_end_of_options(&self, args: &[String], pos: usize) -> bool {
        args.iter().position(|a| a == END_OF_OPTIONS).is_some_and(|i| i < pos)
    }

    /// Index of a positional argument, not counting options and their values
    fn position(&self, args: &[String], pos: usize) -> usize {
        let mut out = 0;
        let mut options_allowed = true;
        for i in 1..pos {
            if options_allowed && i < args.len() {
                if args[i] == END_OF_OPTIONS {
                    options_allowed = false;
                    continue;
                }
                if is_option_start(&args[i]) {
                    continue;
                }
                if i > 1 && self.option_taking_value(args, i - 1).is_some() {
                    continue;
                }
            }
            out += 1;
        }
        out
    }

    /// The option name if `args[pos]` is an option whose value is the next argument
    fn option_taking_value(&self, args: &[String], pos: usize) -> Option<String> {
        let arg = args.get(pos)?;
        if arg.contains('=') || !is_option_start(arg) {
            return None;
        }
        if arg.starts_with("--") {
            return self
                .option(arg)
                .filter(|a| takes_value(a))
                .map(|_| arg.clone());
        }

        // bundled short flags like `-xzf file`
        let flags: Vec<char> = arg.chars().skip(1).collect();
        let (last, bundled) = flags.split_last()?;
        for c in bundled {
            if self.option(&format!("-{c}")).is_some_and(takes_value) {
                // the value is the rest of this argument
                return None;
            }
        }
        let name = format!("-{last}");
        self.option(&name).filter(|a| takes_value(a)).map(|_| name)
    }
}

fn is_option_start(arg: &str) -> bool {
    arg.starts_with('-') || arg.starts_with('+')
}

fn takes_value(arg: &Arg) -> bool {
    arg.get_action().takes_values()
}

fn first_line(message: &str) -> String {
    let line = message.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
