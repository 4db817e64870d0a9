//! Expansion of `${ENV}` and `%setting%` references in values
//!
//! Environment variables are expanded first, then settings. Neither
//! expansion is applied to its own output a second time.

mod env;
mod format_spec;
mod setting;

use regex::{Captures, Regex};

use crate::config::Registry;
use crate::domain::ports::Environment;
use crate::error::ParseError;

pub use env::expand_env;
pub use format_spec::{format_text, format_with_spec};
pub use setting::expand_settings;

/// Expand environment variables, then settings
pub fn expand(text: &str, registry: &Registry, env: &dyn Environment) -> Result<String, ParseError> {
    let text = expand_env(text, env)?;
    expand_settings(&text, registry)
}

/// Like `Regex::replace_all` with a replacement that can fail
fn try_replace_all<F>(re: &Regex, text: &str, mut replace: F) -> Result<String, ParseError>
where
    F: FnMut(&Captures<'_>) -> Result<String, ParseError>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..m.start()]);
        out.push_str(&replace(&caps)?);
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
