//! Settings declared in a TOML schema
//!
//! The command line tool edits the config files of an application it knows
//! nothing about, so the settings are read from a schema file:
//!
//! ```toml
//! appname = "demo"
//!
//! [[setting]]
//! key = "color.fg"
//! type = "str"
//! default = "auto"
//! allowed = ["auto", "red", "blue"]
//! help = "Foreground color"
//!
//! [[setting]]
//! key = "width"
//! type = "int"
//! default = 80
//! unit = "columns"
//! ```
//!
//! Keys the schema does not know are reported as warnings, not errors.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{
    format_variant_name, EnumType, Help, Registry, Setting, SettingOptions, Value, ValueKind,
};
use crate::domain::ports::FileSystem;
use crate::engine::ConfigFileOptions;
use crate::error::{ConfigError, ConfigResult};

/// Top level of a schema file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    pub appname: String,
    /// Force `[id]` groups on or off, decided by the settings if missing
    #[serde(default)]
    pub config_ids: Option<bool>,
    #[serde(default)]
    pub config_name: Option<String>,
    #[serde(default, rename = "setting")]
    pub settings: Vec<SettingSchema>,
    #[serde(skip)]
    path: PathBuf,
}

/// Base type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Str,
    Int,
    Float,
    Bool,
    Enum,
}

/// One `[[setting]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SettingSchema {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: TypeName,
    pub default: toml::Value,
    /// The value is a list of `type`
    #[serde(default)]
    pub list: bool,
    /// Variants of an enum
    #[serde(default)]
    pub variants: Vec<String>,
    /// Name of an enum type in the help, defaults to the key
    #[serde(default)]
    pub enum_name: Option<String>,
    #[serde(default)]
    pub allowed: Option<Vec<toml::Value>>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
    /// Help for each value, takes precedence over `help`
    #[serde(default)]
    pub value_help: Vec<ValueHelp>,
    #[serde(default)]
    pub multi: bool,
    /// Not written when saving
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub separator: Option<String>,
}

/// Description of one value of a setting
#[derive(Debug, Clone, Deserialize)]
pub struct ValueHelp {
    pub value: toml::Value,
    pub help: String,
}

/// A key in the schema file which is not understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    pub file: PathBuf,
    pub key: String,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())
    }
}

impl Schema {
    /// Read and parse a schema file
    pub fn load(fs: &dyn FileSystem, path: &Path) -> ConfigResult<(Self, Vec<SchemaWarning>)> {
        let content = fs.read(path)?;
        Self::parse(&content, path)
    }

    /// Parse the content of a schema file, `path` is used in messages only
    pub fn parse(content: &str, path: &Path) -> ConfigResult<(Self, Vec<SchemaWarning>)> {
        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(content);

        let mut schema: Schema = serde_ignored::deserialize(deserializer, |p| {
            unknown_paths.push(p.to_string());
        })
        .map_err(|e| ConfigError::Schema {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        schema.path = path.to_path_buf();

        let warnings = unknown_paths
            .into_iter()
            .map(|key| SchemaWarning {
                file: path.to_path_buf(),
                key,
            })
            .collect();
        Ok((schema, warnings))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declare every setting of the schema in a new registry
    pub fn registry(&self) -> ConfigResult<Registry> {
        let mut registry = Registry::new();
        for setting in &self.settings {
            let setting = setting.to_setting().map_err(|message| ConfigError::Schema {
                path: self.path.clone(),
                message,
            })??;
            registry.insert(setting)?;
        }
        Ok(registry)
    }

    /// Engine options for the application described by the schema
    pub fn options(&self) -> ConfigFileOptions {
        let mut options = ConfigFileOptions::new(&self.appname);
        if let Some(enable) = self.config_ids {
            options = options.with_config_ids(enable);
        }
        if let Some(name) = &self.config_name {
            options = options.with_config_name(name);
        }
        options
    }
}

impl SettingSchema {
    fn kind(&self) -> Result<ValueKind, String> {
        let item = match self.type_name {
            TypeName::Str => ValueKind::Str,
            TypeName::Int => ValueKind::Int,
            TypeName::Float => ValueKind::Float,
            TypeName::Bool => ValueKind::Bool,
            TypeName::Enum => {
                if self.variants.is_empty() {
                    return Err(format!("{}: enum without variants", self.key));
                }
                let name = self.enum_name.clone().unwrap_or_else(|| self.key.clone());
                ValueKind::Enum(EnumType::new(name, &self.variants))
            }
        };
        Ok(if self.list {
            ValueKind::List(Box::new(item))
        } else {
            item
        })
    }

    /// The outer error is a problem in the schema, the inner one a
    /// declaration the registry refuses.
    fn to_setting(&self) -> Result<ConfigResult<Setting>, String> {
        let kind = self.kind()?;
        let in_key = |reason: String| format!("{}: {reason}", self.key);

        let default = convert(&kind, &self.default).map_err(in_key)?;
        let allowed_values = match &self.allowed {
            Some(values) => Some(
                values
                    .iter()
                    .map(|v| convert(kind.item_kind(), v))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(in_key)?,
            ),
            None => None,
        };
        let help = if self.value_help.is_empty() {
            self.help.clone().map(Help::Text)
        } else {
            let per_value = self
                .value_help
                .iter()
                .map(|h| convert(kind.item_kind(), &h.value).map(|v| (v, h.help.clone())))
                .collect::<Result<Vec<_>, _>>()
                .map_err(in_key)?;
            Some(Help::PerValue(per_value))
        };

        let options = SettingOptions {
            unit: self.unit.clone(),
            help,
            allowed_values,
            multi: self.multi,
            parent: None,
            list_separator: self.separator.clone(),
            hidden: self.hidden,
            check_config_id: None,
        };
        Ok(Setting::new(self.key.clone(), default, options))
    }
}

fn convert(kind: &ValueKind, value: &toml::Value) -> Result<Value, String> {
    match (kind, value) {
        (ValueKind::List(item), toml::Value::Array(items)) => items
            .iter()
            .map(|v| convert(item, v))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        (ValueKind::Str, toml::Value::String(s)) => Ok(Value::Str(s.clone())),
        (ValueKind::Int, toml::Value::Integer(i)) => Ok(Value::Int(*i)),
        (ValueKind::Float, toml::Value::Float(x)) => Ok(Value::Float(*x)),
        (ValueKind::Float, toml::Value::Integer(i)) => Ok(Value::Float(*i as f64)),
        (ValueKind::Bool, toml::Value::Boolean(b)) => Ok(Value::Bool(*b)),
        (ValueKind::Enum(ty), toml::Value::String(s)) => ty
            .value(&format_variant_name(s))
            .map(Value::Enum)
            .ok_or_else(|| format!("'{s}' is not one of {}", ty.variants().join(", "))),
        (kind, value) => Err(format!(
            "expected {}, got {}",
            kind.type_name(),
            value.type_str()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (Schema, Vec<SchemaWarning>) {
        Schema::parse(content, Path::new("schema.toml")).unwrap()
    }

    #[test]
    fn test_schema_builds_registry() {
        let (schema, warnings) = parse(
            r#"
appname = "demo"

[[setting]]
key = "color.fg"
type = "str"
default = "auto"
allowed = ["auto", "red", "blue"]
help = "Foreground color"

[[setting]]
key = "width"
type = "int"
default = 80
unit = "columns"

[[setting]]
key = "ratio"
type = "float"
default = 1
unit = ""

[[setting]]
key = "tags"
type = "str"
list = true
default = ["a", "b"]
"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(schema.appname, "demo");

        let registry = schema.registry().unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.format_value("color.fg", None).unwrap(), "auto");
        assert_eq!(registry.format_value("width", None).unwrap(), "80");
        assert_eq!(registry.value("ratio", None), Some(&Value::Float(1.0)));
        assert_eq!(registry.format_value("tags", None).unwrap(), "a,b");
        assert_eq!(
            registry.get("color.fg").unwrap().allowed_values().map(<[Value]>::len),
            Some(3)
        );
    }

    #[test]
    fn test_schema_enum_and_value_help() {
        let (schema, _) = parse(
            r#"
appname = "demo"

[[setting]]
key = "theme"
type = "enum"
variants = ["light", "dark_blue"]
default = "dark-blue"

[[setting.value-help]]
value = "light"
help = "black on white"
"#,
        );
        let registry = schema.registry().unwrap();
        assert_eq!(registry.format_value("theme", None).unwrap(), "dark-blue");
        assert!(matches!(
            registry.get("theme").unwrap().help(),
            Some(Help::PerValue(values)) if values.len() == 1
        ));
    }

    #[test]
    fn test_schema_unknown_keys_are_warnings() {
        let (_, warnings) = parse(
            r#"
appname = "demo"
colour = "red"

[[setting]]
key = "name"
type = "str"
default = "x"
halp = "typo"
"#,
        );
        let keys: Vec<_> = warnings.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"colour"));
        assert!(keys.iter().any(|k| k.ends_with("halp")));
        assert!(warnings[0].to_string().starts_with("unknown key"));
    }

    #[test]
    fn test_schema_type_mismatch() {
        let (schema, _) = parse(
            r#"
appname = "demo"

[[setting]]
key = "width"
type = "int"
default = "wide"
unit = ""
"#,
        );
        let err = schema.registry().unwrap_err();
        assert!(matches!(err, ConfigError::Schema { .. }));
        assert!(err.to_string().contains("width: expected int, got string"), "{err}");
    }

    #[test]
    fn test_schema_registry_errors_pass_through() {
        let (schema, _) = parse(
            r#"
appname = "demo"

[[setting]]
key = "width"
type = "int"
default = 80
"#,
        );
        assert!(matches!(schema.registry(), Err(ConfigError::MissingUnit(_))));
    }

    #[test]
    fn test_schema_invalid_toml() {
        let err = Schema::parse("appname = ", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().starts_with("invalid schema bad.toml"));
    }

    #[test]
    fn test_schema_options() {
        let (schema, _) = parse("appname = \"demo\"\nconfig-ids = true\nconfig-name = \"demo.conf\"\n");
        let options = schema.options();
        assert_eq!(options.appname, "demo");
        assert_eq!(options.enable_config_ids, Some(true));
        assert_eq!(options.config_name, "demo.conf");
    }
}
