//! `%key%` expansion
//!
//! A field has the form `key[!conversion][:format_spec]`, `%%` is a literal
//! percent sign. Conversions:
//!
//! - `!` the value as it would be written to a config file
//! - `!r` / `!a` a quoted representation, `!a` escapes non ASCII characters
//! - `!s` the plain value
//!
//! Without a conversion a format spec is applied to the typed value.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Registry;
use crate::error::ParseError;

use super::format_spec::{format_text, format_with_spec};
use super::try_replace_all;

static SETTING_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([^%]*)%").expect("setting reference regex"));

/// Replace every `%...%` in `text` with the value of the referenced setting
pub fn expand_settings(text: &str, registry: &Registry) -> Result<String, ParseError> {
    if text.matches('%').count() % 2 == 1 {
        return Err(ParseError::UnevenPercent);
    }
    try_replace_all(&SETTING_REFERENCE, text, |caps| expand_field(&caps[1], registry))
}

fn expand_field(field: &str, registry: &Registry) -> Result<String, ParseError> {
    if field.is_empty() {
        return Ok("%".to_string());
    }

    let (rest, spec) = match field.rsplit_once(':') {
        Some((rest, spec)) => (rest, Some(spec)),
        None => (field, None),
    };
    let (key, conversion) = match rest.split_once('!') {
        Some((key, conversion)) => (key, Some(conversion)),
        None => (rest, None),
    };
    let setting = registry
        .get(key)
        .ok_or_else(|| ParseError::InvalidKey(key.to_string()))?;

    let invalid_spec = |spec: &str, reason: String| ParseError::InvalidFormatSpec {
        key: key.to_string(),
        spec: spec.to_string(),
        reason,
    };

    let Some(conversion) = conversion else {
        return match spec {
            None => Ok(setting.format_value(None)),
            Some(spec) => format_with_spec(setting.value(), spec).map_err(|e| invalid_spec(spec, e)),
        };
    };

    let text = match conversion {
        "" => setting.format_value(None),
        "r" => setting.value().to_repr(false),
        "a" => setting.value().to_repr(true),
        "s" => setting.value().to_plain_string(),
        other => return Err(ParseError::InvalidConversion(other.to_string())),
    };
    match spec {
        None => Ok(text),
        Some(spec) => format_text(&text, spec).map_err(|e| invalid_spec(spec, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.define("name", "Grüße\nWelt".to_string()).register().unwrap();
        registry.define("width", 42_i64).with_unit("").register().unwrap();
        registry
            .define("langs", vec!["en".to_string(), "de".to_string()])
            .register()
            .unwrap();
        registry
    }

    #[test]
    fn test_percent_escapes() {
        let r = registry();
        assert_eq!(expand_settings("100%%", &r).unwrap(), "100%");
        assert_eq!(expand_settings("50%", &r), Err(ParseError::UnevenPercent));
        assert_eq!(expand_settings("no references", &r).unwrap(), "no references");
    }

    #[test]
    fn test_formatted_value() {
        let r = registry();
        assert_eq!(expand_settings("w=%width%", &r).unwrap(), "w=42");
        assert_eq!(expand_settings("%name%", &r).unwrap(), r"Grüße\nWelt");
        assert_eq!(expand_settings("%name!%", &r).unwrap(), r"Grüße\nWelt");
        assert_eq!(expand_settings("%langs%", &r).unwrap(), "en,de");
    }

    #[test]
    fn test_conversions() {
        let r = registry();
        assert_eq!(expand_settings("%name!s%", &r).unwrap(), "Grüße\nWelt");
        assert_eq!(expand_settings("%name!r%", &r).unwrap(), r"'Grüße\nWelt'");
        assert_eq!(expand_settings("%name!a%", &r).unwrap(), r"'Gr\u{fc}\u{df}e\nWelt'");
        assert_eq!(expand_settings("%langs!r%", &r).unwrap(), "['en', 'de']");
        assert_eq!(
            expand_settings("%width!x%", &r),
            Err(ParseError::InvalidConversion("x".to_string()))
        );
    }

    #[test]
    fn test_format_spec() {
        let r = registry();
        assert_eq!(expand_settings("[%width:>5%]", &r).unwrap(), "[   42]");
        assert_eq!(expand_settings("%width:#x%", &r).unwrap(), "0x2a");
        assert_eq!(expand_settings("%width!s:>4%", &r).unwrap(), "  42");
        assert!(matches!(
            expand_settings("%width:q%", &r),
            Err(ParseError::InvalidFormatSpec { .. })
        ));
    }

    #[test]
    fn test_unknown_key() {
        let r = registry();
        assert_eq!(
            expand_settings("%missing%", &r),
            Err(ParseError::InvalidKey("missing".to_string()))
        );
    }
}
