//! `${NAME}` expansion with the POSIX parameter expansion operators
//!
//! - `${NAME:-word}` / `${NAME-word}`: `word` if NAME is unset (or empty)
//! - `${NAME:=word}` / `${NAME=word}`: as `-`, and assign `word` to NAME
//! - `${NAME:?word}` / `${NAME?word}`: error with `word` as message if NAME is unset (or empty)
//! - `${NAME:+word}` / `${NAME+word}`: `word` if NAME is set (and not empty), empty otherwise
//!
//! `word` is not expanded. The first operator character in the field is the operator.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ports::Environment;
use crate::error::ParseError;

use super::try_replace_all;

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]*)\}").expect("env reference regex"));

const OPERATORS: [char; 4] = ['-', '=', '?', '+'];

/// Replace every `${...}` in `text`
pub fn expand_env(text: &str, env: &dyn Environment) -> Result<String, ParseError> {
    try_replace_all(&ENV_REFERENCE, text, |caps| expand_reference(&caps[1], env))
}

fn expand_reference(field: &str, env: &dyn Environment) -> Result<String, ParseError> {
    let Some(pos) = field.find(OPERATORS) else {
        return Ok(env.get(field).unwrap_or_default());
    };
    let op = &field[pos..pos + 1];
    let arg = &field[pos + 1..];
    let (name, empty_is_unset) = match field[..pos].strip_suffix(':') {
        Some(name) => (name, true),
        None => (&field[..pos], false),
    };

    let value = env.get(name);
    let is_set = match &value {
        Some(v) => !(empty_is_unset && v.is_empty()),
        None => false,
    };
    let value = value.unwrap_or_default();

    match op {
        "-" => Ok(if is_set { value } else { arg.to_string() }),
        "=" => {
            if is_set {
                Ok(value)
            } else {
                env.set(name, arg);
                Ok(arg.to_string())
            }
        }
        "?" => {
            if is_set {
                return Ok(value);
            }
            if !arg.is_empty() {
                return Err(ParseError::EnvUnset(arg.to_string()));
            }
            let state = if env.contains(name) { "empty" } else { "unset" };
            Err(ParseError::EnvUnset(format!("environment variable {name} is {state}")))
        }
        _ => Ok(if is_set { arg.to_string() } else { String::new() }),
    }
}
