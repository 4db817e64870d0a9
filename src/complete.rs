//! Completion of partially typed lines
//!
//! A completion answers "what could be typed at the cursor" with three parts:
//! everything before the candidates, the candidates themselves and everything
//! after them. Splicing any candidate between the two ends gives a line which
//! the tokenizer can split. Cursor positions are byte offsets.

use std::path::{Path, MAIN_SEPARATOR};

use crate::domain::ports::FileSystem;
use crate::parser::{is_removed_by_tokenizer, is_separator, quote};

/// Candidates for the text at the cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    pub start_of_line: String,
    pub candidates: Vec<String>,
    pub end_of_line: String,
}

impl Completions {
    pub fn new(start_of_line: impl Into<String>, candidates: Vec<String>, end_of_line: impl Into<String>) -> Self {
        Self {
            start_of_line: start_of_line.into(),
            candidates,
            end_of_line: end_of_line.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The complete line for every candidate
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.candidates
            .iter()
            .map(|c| format!("{}{}{}", self.start_of_line, c, self.end_of_line))
    }
}

/// Location of the cursor relative to the arguments of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgPos {
    /// Index of the argument at the cursor. If the cursor is behind the last
    /// argument this is one past the end and `in_between` is set.
    pub argument_pos: usize,
    /// The cursor is in whitespace between arguments, or before the first or after the last one
    pub in_between: bool,
    /// Start of the argument at the cursor, or of the next argument if `in_between`
    pub i0: usize,
    /// End of the argument at the cursor, or of the previous argument if `in_between`
    pub i1: usize,
}

/// Walk `line` and its split `args` side by side to find the argument at `cursor`.
///
/// Quotes and backslashes are in the line but not in the arguments, so they
/// are skipped. A `#` behind the last argument starts a comment which counts
/// as part of that argument.
pub fn find_arg(line: &str, args: &[String], cursor: usize) -> ArgPos {
    let mut out = ArgPos {
        argument_pos: 0,
        in_between: true,
        i0: 0,
        i1: 0,
    };
    let mut i_ln = 0;
    let mut i_in_arg = 0;

    loop {
        let Some(c) = line[i_ln..].chars().next() else {
            if out.in_between {
                out.i0 = i_ln;
            } else {
                out.i1 = i_ln;
            }
            return out;
        };

        if out.in_between {
            if is_separator(c) {
                i_ln += c.len_utf8();
                continue;
            }
            out.i0 = i_ln;
            if i_ln >= cursor {
                return out;
            }
            out.in_between = false;
            continue;
        }

        let Some(arg) = args.get(out.argument_pos) else {
            // a comment
            out.i1 = line.len();
            return out;
        };

        if i_in_arg >= arg.len() {
            if is_separator(c) {
                out.i1 = i_ln;
                if i_ln >= cursor {
                    return out;
                }
                out.in_between = true;
                out.argument_pos += 1;
                i_in_arg = 0;
                i_ln += c.len_utf8();
            } else if is_removed_by_tokenizer(c) {
                i_ln += c.len_utf8();
            } else {
                // a comment right behind the argument
                out.i1 = i_ln;
                return out;
            }
        } else if arg[i_in_arg..].starts_with(c) {
            i_ln += c.len_utf8();
            i_in_arg += c.len_utf8();
        } else {
            i_ln += c.len_utf8();
        }
    }
}

/// What a command is asked to complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    /// The split line, `args[0]` is the command name
    pub args: &'a [String],
    pub argument_pos: usize,
    /// Offset of the cursor inside the argument, meaningless if `in_between`
    pub cursor_pos: usize,
    pub in_between: bool,
    pub start_of_line: String,
    pub end_of_line: String,
}

impl<'a> CompletionRequest<'a> {
    /// The part of the current argument before the cursor
    pub fn start(&self) -> &'a str {
        if self.in_between {
            return "";
        }
        match self.args.get(self.argument_pos) {
            Some(arg) => prefix(arg, self.cursor_pos),
            None => "",
        }
    }

    /// Move `text` from the argument into the fixed start of the line,
    /// e.g. the `key=` of `key=value` when only values are completed
    pub fn keep(mut self, text: &str) -> Self {
        self.start_of_line.push_str(text);
        self
    }

    pub fn reply(self, candidates: Vec<String>) -> Completions {
        Completions::new(self.start_of_line, candidates, self.end_of_line)
    }

    pub fn nothing(self) -> Completions {
        self.reply(Vec::new())
    }
}

/// The first `n` bytes of `s`, shortened to a character boundary
pub(crate) fn prefix(s: &str, n: usize) -> &str {
    let mut n = n.min(s.len());
    while !s.is_char_boundary(n) {
        n -= 1;
    }
    &s[..n]
}

/// Quote every component of a path, a leading `~` stays as it is
pub fn quote_path(path: &str) -> String {
    path.split(MAIN_SEPARATOR)
        .enumerate()
        .map(|(i, part)| {
            if part.is_empty() || (i == 0 && part == "~") {
                part.to_string()
            } else {
                quote(part)
            }
        })
        .collect::<Vec<_>>()
        .join(&MAIN_SEPARATOR.to_string())
}

/// Files and directories starting with `start`.
///
/// Relative paths are relative to `relative_to`. Directories get a trailing
/// separator after quoting. Hidden entries are only offered if the typed name
/// starts with a dot.
pub fn file_name_completions(
    fs: &dyn FileSystem,
    start: &str,
    relative_to: &Path,
    request: CompletionRequest<'_>,
) -> Completions {
    let (request, directory, name_start) = match start.rsplit_once(MAIN_SEPARATOR) {
        Some((dir, name)) => {
            let dir = format!("{dir}{MAIN_SEPARATOR}");
            let request = request.keep(&quote_path(&dir));
            let expanded = fs.expand_home(Path::new(&dir));
            let directory = if expanded.is_absolute() {
                expanded
            } else {
                relative_to.join(expanded)
            };
            (request, directory, name)
        }
        None => (request, relative_to.to_path_buf(), start),
    };

    let show_hidden = cfg!(windows) || name_start.starts_with('.');
    let Ok(mut names) = fs.list_dir(&directory) else {
        return request.nothing();
    };
    names.sort();

    let candidates = names
        .into_iter()
        .filter(|name| show_hidden || !name.starts_with('.'))
        .filter(|name| name.starts_with(name_start))
        .map(|name| {
            let mut quoted = quote(&name);
            if fs.is_dir(&directory.join(&name)) {
                quoted.push(MAIN_SEPARATOR);
            }
            quoted
        })
        .collect();
    request.reply(candidates)
}
