//! A single declared setting

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult, ParseError, ValueError};

use super::registry::ConfigId;
use super::value::{parse_float, parse_int, Value, ValueKind, LIST_SEP, VALUE_FALSE, VALUE_TRUE};

/// Validates a config id before a multi setting stores a value for it
pub type ConfigIdCheck = Arc<dyn Fn(&str, &ConfigId) -> Result<(), String> + Send + Sync>;

/// Help attached to a setting
#[derive(Debug, Clone, PartialEq)]
pub enum Help {
    /// A description of the setting
    Text(String),
    /// A description of each value
    PerValue(Vec<(Value, String)>),
}

/// A named, typed configuration value
#[derive(Clone)]
pub struct Setting {
    key: String,
    kind: ValueKind,
    value: Value,
    values: BTreeMap<ConfigId, Value>,
    multi: bool,
    unit: Option<String>,
    help: Option<Help>,
    allowed_values: Option<Vec<Value>>,
    parent: Option<String>,
    list_separator: String,
    exported: bool,
    check_config_id: Option<ConfigIdCheck>,
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("values", &self.values)
            .field("multi", &self.multi)
            .finish_non_exhaustive()
    }
}

/// Optional properties of a setting
#[derive(Clone, Default)]
pub struct SettingOptions {
    pub unit: Option<String>,
    pub help: Option<Help>,
    pub allowed_values: Option<Vec<Value>>,
    pub multi: bool,
    pub parent: Option<String>,
    pub list_separator: Option<String>,
    pub hidden: bool,
    pub check_config_id: Option<ConfigIdCheck>,
}

impl Setting {
    /// Declare a setting. The kind is derived from `default`.
    pub fn new(key: impl Into<String>, default: Value, options: SettingOptions) -> ConfigResult<Self> {
        let key = key.into();
        let kind = default
            .kind()
            .ok_or_else(|| ConfigError::EmptyListDefault(key.clone()))?;
        if kind.needs_unit() && options.unit.is_none() {
            return Err(ConfigError::MissingUnit(key));
        }
        if let Some(allowed) = &options.allowed_values {
            let item_kind = kind.item_kind();
            if let Some(bad) = allowed.iter().find(|v| !v.matches_kind(item_kind)) {
                return Err(ConfigError::AllowedValueType {
                    key,
                    value: bad.to_string(),
                });
            }
        }

        Ok(Self {
            key,
            kind,
            value: default,
            values: BTreeMap::new(),
            multi: options.multi,
            unit: options.unit,
            help: options.help,
            allowed_values: options.allowed_values,
            parent: options.parent,
            list_separator: options.list_separator.unwrap_or_else(|| LIST_SEP.to_string()),
            exported: !options.hidden,
            check_config_id: options.check_config_id,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn set_key(&mut self, key: String) {
        self.key = key;
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn help(&self) -> Option<&Help> {
        self.help.as_ref()
    }

    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_deref()
    }

    /// Key prefix of the DictConfig this setting belongs to
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Whether this setting is written when saving
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    pub fn list_separator(&self) -> &str {
        &self.list_separator
    }

    /// The default value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value for `config_id`, falling back to the default value
    pub fn get_value(&self, config_id: Option<&ConfigId>) -> &Value {
        match config_id {
            Some(id) if !id.is_default() => self.values.get(id).unwrap_or(&self.value),
            _ => &self.value,
        }
    }

    /// Config ids with a value of their own
    pub fn group_values(&self) -> impl Iterator<Item = (&ConfigId, &Value)> {
        self.values.iter()
    }

    /// Store `value` for `config_id`.
    ///
    /// Only multi settings accept ids other than the default one. The config id
    /// check runs for every non-default id.
    pub(crate) fn set_value(&mut self, config_id: Option<&ConfigId>, value: Value) -> Result<(), ParseError> {
        if !value.matches_kind(&self.kind) {
            return Err(ValueError::new(
                self.key.clone(),
                self.format(&value),
                format!("expected {}", self.format_type()),
            )
            .into());
        }

        let id = match config_id {
            Some(id) if !id.is_default() => id,
            _ => {
                self.value = value;
                return Ok(());
            }
        };

        if !self.multi {
            return Err(ParseError::NotMulti {
                key: self.key.clone(),
                config_id: id.to_string(),
                default: ConfigId::default().to_string(),
            });
        }
        if let Some(check) = &self.check_config_id {
            check(&self.key, id).map_err(ParseError::Rejected)?;
        }
        self.values.insert(id.clone(), value);
        Ok(())
    }

    pub(crate) fn clear_group_values(&mut self) {
        self.values.clear();
    }

    // ------- parse -------

    /// Parse text from a config file or an environment variable
    pub fn parse(&self, text: &str) -> Result<Value, ValueError> {
        self.parse_part(&self.kind, text)
    }

    fn parse_part(&self, kind: &ValueKind, text: &str) -> Result<Value, ValueError> {
        let invalid = |reason: String| ValueError::new(self.key.clone(), text, reason);
        let should_be = || {
            let expected = if self.kind.is_list() {
                self.format_item_allowed_values_or_type()
            } else {
                self.format_allowed_values_or_type()
            };
            invalid(format!("should be {expected}"))
        };

        let out = match kind {
            ValueKind::Str => Value::Str(text.replace("\\n", "\n")),
            ValueKind::Int => Value::Int(parse_int(text).map_err(invalid)?),
            ValueKind::Float => Value::Float(parse_float(text).map_err(invalid)?),
            ValueKind::Bool => match text {
                VALUE_TRUE => Value::Bool(true),
                VALUE_FALSE => Value::Bool(false),
                _ => return Err(should_be()),
            },
            ValueKind::List(item) => {
                let items = text
                    .split(self.list_separator.as_str())
                    .map(|part| self.parse_part(item, part))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::List(items));
            }
            ValueKind::Enum(ty) => match ty.value(text) {
                Some(v) => Value::Enum(v),
                None => return Err(should_be()),
            },
            ValueKind::Custom(ty) => Value::Custom(ty.value(text).map_err(invalid)?),
        };

        if let Some(allowed) = &self.allowed_values {
            if !allowed.contains(&out) {
                return Err(should_be());
            }
        }
        Ok(out)
    }

    // ------- format -------

    /// Convert a value of this setting to the text written to a config file
    pub fn format(&self, value: &Value) -> String {
        match value {
            Value::Str(s) => s.replace('\n', "\\n"),
            Value::List(items) => items
                .iter()
                .map(|v| self.format(v))
                .collect::<Vec<_>>()
                .join(&self.list_separator),
            other => other.to_string(),
        }
    }

    /// Format the value for `config_id`
    pub fn format_value(&self, config_id: Option<&ConfigId>) -> String {
        self.format(self.get_value(config_id))
    }

    /// Allowed values of `kind` formatted for the config file.
    ///
    /// Explicit allowed values apply to scalar kinds and to the items of lists.
    pub fn allowed_value_strings(&self, kind: &ValueKind) -> Vec<String> {
        match kind {
            ValueKind::List(_) => Vec::new(),
            _ if self.allowed_values.is_some() => self
                .allowed_values
                .iter()
                .flatten()
                .map(|v| self.format(v))
                .collect(),
            ValueKind::Bool => vec![VALUE_TRUE.to_string(), VALUE_FALSE.to_string()],
            ValueKind::Enum(ty) => ty.variants().to_vec(),
            _ => Vec::new(),
        }
    }

    fn format_allowed_values_of(&self, kind: &ValueKind) -> String {
        let mut out = self.allowed_value_strings(kind).join(", ");
        if !out.is_empty() {
            if let Some(unit) = self.unit.as_deref().filter(|u| !u.is_empty()) {
                out.push_str(&format!(" (unit: {unit})"));
            }
        }
        out
    }

    /// Human readable type, e.g. `int in px` or `comma separated list of str`
    pub fn format_type(&self) -> String {
        if let ValueKind::List(item) = &self.kind {
            let mut item_desc = self.format_allowed_values_of(item);
            if item_desc.is_empty() {
                item_desc = self.format_type_of(item);
            }
            return if self.list_separator == LIST_SEP {
                format!("comma separated list of {item_desc}")
            } else {
                format!("list of {item_desc} separated by '{}'", self.list_separator)
            };
        }
        self.format_type_of(&self.kind)
    }

    fn format_type_of(&self, kind: &ValueKind) -> String {
        let mut out = kind.type_name();
        if let Some(unit) = self.unit.as_deref().filter(|u| !u.is_empty()) {
            out.push_str(&format!(" in {unit}"));
        }
        out
    }

    /// `one of ...` if the values are restricted, otherwise the type with an article
    pub fn format_allowed_values_or_type(&self) -> String {
        let allowed = self.format_allowed_values_of(&self.kind);
        if !allowed.is_empty() {
            return format!("one of {allowed}");
        }
        with_article(self.format_type())
    }

    /// Same as [`Setting::format_allowed_values_or_type`] for a single list item
    fn format_item_allowed_values_or_type(&self) -> String {
        let item = self.kind.item_kind();
        let allowed = self.format_allowed_values_of(item);
        if !allowed.is_empty() {
            return format!("one of {allowed}");
        }
        with_article(self.format_type_of(item))
    }
}

fn with_article(ty: String) -> String {
    let article = match ty.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o') => "an",
        _ => "a",
    };
    format!("{article} {ty}")
}
