//! Completion of a line typed by the user

use crate::command::DEFAULT_COMMAND;
use crate::complete::{find_arg, prefix, CompletionRequest, Completions};
use crate::parser::{is_separator, split_line_lenient};

use super::{ConfigFile, ENTER_GROUP_PREFIX, ENTER_GROUP_SUFFIX};

impl ConfigFile {
    /// Candidates for the text at byte offset `cursor` of `line`.
    ///
    /// Splicing a candidate between `start_of_line` and `end_of_line` of the
    /// result gives the completed line.
    pub fn get_completions(&self, line: &str, cursor: usize) -> Completions {
        let cursor = prefix(line, cursor).len();
        let stripped = line.trim_start_matches(is_separator);
        let indentation = &line[..line.len() - stripped.len()];
        let cursor = cursor.saturating_sub(indentation.len());

        let mut out = if self.enable_config_ids && stripped.starts_with(ENTER_GROUP_PREFIX) {
            self.complete_config_id(stripped)
        } else {
            self.complete_command(stripped, cursor)
        };
        out.start_of_line.insert_str(0, indentation);
        out
    }

    fn complete_config_id(&self, line: &str) -> Completions {
        let candidates = self
            .registry
            .config_ids()
            .iter()
            .map(|id| format!("{ENTER_GROUP_PREFIX}{id}{ENTER_GROUP_SUFFIX}"))
            .filter(|group| group.starts_with(line))
            .collect();
        Completions::new("", candidates, "")
    }

    fn complete_command(&self, line: &str, cursor: usize) -> Completions {
        if line.is_empty() {
            return Completions::new("", self.command_names_starting_with(""), "");
        }

        let args = split_line_lenient(line);
        if args.is_empty() {
            // nothing but a comment
            return Completions::new(&line[..cursor], Vec::new(), &line[cursor..]);
        }

        let pos = find_arg(line, &args, cursor);
        let (start_of_line, end_of_line) = if pos.in_between {
            (&line[..cursor], &line[cursor..])
        } else {
            (&line[..pos.i0], &line[pos.i1..])
        };

        if pos.argument_pos == 0 {
            let candidates = self.command_names_starting_with(&line[..cursor]);
            return Completions::new(start_of_line, candidates, end_of_line);
        }

        let request = CompletionRequest {
            args: &args,
            argument_pos: pos.argument_pos,
            cursor_pos: cursor.saturating_sub(pos.i0),
            in_between: pos.in_between,
            start_of_line: start_of_line.to_string(),
            end_of_line: end_of_line.to_string(),
        };
        self.get_command(&args[0]).completions(request, self)
    }

    fn command_names_starting_with(&self, start: &str) -> Vec<String> {
        self.command_names()
            .flatten()
            .filter(|name| name.as_str() != DEFAULT_COMMAND && name.starts_with(start))
            .cloned()
            .collect()
    }
}
