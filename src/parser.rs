//! Line tokenizer for config files
//!
//! Lines are split like a POSIX shell would split them, without any
//! expansion: whitespace separates arguments, single quotes keep everything
//! literally, double quotes allow `\"` and `\\`, a backslash outside of
//! quotes escapes the next character and `#` starts a comment, even inside
//! of an unquoted argument.

use crate::error::ParseError;

const NO_CLOSING_QUOTATION: &str = "No closing quotation";
const NO_ESCAPED_CHARACTER: &str = "No escaped character";

/// Characters which separate arguments
pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters which the tokenizer consumes without adding them to an argument
pub(crate) fn is_removed_by_tokenizer(c: char) -> bool {
    matches!(c, '"' | '\'' | '\\')
}

/// A line which could not be split completely
#[derive(Debug)]
struct Unterminated {
    message: &'static str,
    tokens: Vec<String>,
    partial: String,
}

#[derive(Debug, Default)]
struct Tokens {
    done: Vec<String>,
    current: String,
    quoted: bool,
}

impl Tokens {
    fn finish(&mut self) {
        if !self.current.is_empty() || self.quoted {
            self.done.push(std::mem::take(&mut self.current));
        }
        self.quoted = false;
    }

    fn fail(self, message: &'static str) -> Unterminated {
        Unterminated {
            message,
            tokens: self.done,
            partial: self.current,
        }
    }
}

fn tokenize(line: &str) -> Result<Vec<String>, Unterminated> {
    let mut tokens = Tokens::default();
    let mut chars = line.chars();
    let mut in_word = false;

    while let Some(c) = chars.next() {
        match c {
            c if is_separator(c) => {
                if in_word {
                    tokens.finish();
                    in_word = false;
                }
            }
            '#' => {
                if in_word {
                    tokens.finish();
                    in_word = false;
                }
                // the comment ends at the end of the physical line
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '\'' | '"' => {
                in_word = true;
                tokens.quoted = true;
                loop {
                    match chars.next() {
                        None => return Err(tokens.fail(NO_CLOSING_QUOTATION)),
                        Some(q) if q == c => break,
                        Some('\\') if c == '"' => {
                            let Some(escaped) = chars.next() else {
                                return Err(tokens.fail(NO_ESCAPED_CHARACTER));
                            };
                            if escaped != '"' && escaped != '\\' {
                                tokens.current.push('\\');
                            }
                            tokens.current.push(escaped);
                        }
                        Some(other) => tokens.current.push(other),
                    }
                }
            }
            '\\' => {
                in_word = true;
                let Some(escaped) = chars.next() else {
                    return Err(tokens.fail(NO_ESCAPED_CHARACTER));
                };
                tokens.current.push(escaped);
            }
            other => {
                in_word = true;
                tokens.current.push(other);
            }
        }
    }

    if in_word {
        tokens.finish();
    }
    Ok(tokens.done)
}

/// Split a line into arguments.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] if a quotation is not closed or the line
/// ends with a backslash.
pub fn split_line(line: &str) -> Result<Vec<String>, ParseError> {
    tokenize(line).map_err(|e| ParseError::Syntax(e.message.to_string()))
}

/// Split a line which may be incomplete, as it is while the user is typing.
///
/// An unterminated last argument is returned as far as it could be read.
pub fn split_line_lenient(line: &str) -> Vec<String> {
    match tokenize(line) {
        Ok(tokens) => tokens,
        Err(e) => {
            let mut tokens = e.tokens;
            tokens.push(e.partial);
            tokens
        }
    }
}

/// Quote `value` so that [`split_line`] reads it back as exactly one argument.
///
/// Values which need no quoting are returned unchanged, otherwise single
/// quotes are preferred over double quotes.
pub fn quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    if value.chars().all(is_plain) {
        return value.to_string();
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn is_plain(c: char) -> bool {
    !is_separator(c) && !is_removed_by_tokenizer(c) && c != '#'
}
