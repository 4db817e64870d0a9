//! The settings registry and typed accessors

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult, ParseError};

use super::setting::{ConfigIdCheck, Help, Setting, SettingOptions};
use super::value::{EnumType, Value};

/// Name of the group which is active when no `[id]` line has been read
pub const DEFAULT_CONFIG_ID: &str = "general";

/// Identifies a group of per-object values
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigId(String);

impl ConfigId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_CONFIG_ID
    }
}

impl Default for ConfigId {
    fn default() -> Self {
        Self(DEFAULT_CONFIG_ID.to_string())
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConfigId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConfigId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A Rust type which can be stored in a setting
pub trait SettingValue: Sized {
    fn into_value(self) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
    /// Used in type mismatch errors
    fn type_name() -> String;
}

impl SettingValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn type_name() -> String {
        "str".to_string()
    }
}

impl SettingValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn type_name() -> String {
        "int".to_string()
    }
}

impl SettingValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn type_name() -> String {
        "float".to_string()
    }
}

impl SettingValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn type_name() -> String {
        "bool".to_string()
    }
}

impl SettingValue for Value {
    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn type_name() -> String {
        "value".to_string()
    }
}

impl<T: SettingValue> SettingValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(SettingValue::into_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    fn type_name() -> String {
        format!("list of {}", T::type_name())
    }
}

/// A fieldless Rust enum usable as a setting value or a dict key.
///
/// ```
/// use confline::config::ConfigEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Theme {
///     Dark,
///     HighContrast,
/// }
///
/// impl ConfigEnum for Theme {
///     const TYPE_NAME: &'static str = "theme";
///
///     fn variants() -> &'static [Self] {
///         &[Theme::Dark, Theme::HighContrast]
///     }
///
///     fn variant_name(&self) -> &'static str {
///         match self {
///             Theme::Dark => "Dark",
///             Theme::HighContrast => "HighContrast",
///         }
///     }
/// }
/// ```
pub trait ConfigEnum: Copy + 'static {
    const TYPE_NAME: &'static str;

    fn variants() -> &'static [Self];

    /// The name of the variant as written in code, it is converted to lower case with hyphens
    fn variant_name(&self) -> &'static str;

    fn enum_type() -> Arc<EnumType> {
        EnumType::new(Self::TYPE_NAME, Self::variants().iter().map(|v| v.variant_name()))
    }
}

impl<E: ConfigEnum> SettingValue for E {
    fn into_value(self) -> Value {
        let index = E::variants()
            .iter()
            .position(|v| v.variant_name() == self.variant_name())
            .unwrap_or_default();
        let ty = E::enum_type();
        let name = ty.variants()[index].clone();
        match ty.value(&name) {
            Some(v) => Value::Enum(v),
            None => Value::Str(name),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Enum(v) if v.enum_type().name() == E::TYPE_NAME => E::variants().get(v.index()).copied(),
            _ => None,
        }
    }

    fn type_name() -> String {
        E::TYPE_NAME.to_string()
    }
}

/// All declared settings of an application plus the known config ids.
///
/// Keys are unique. Iteration is sorted by key.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    settings: BTreeMap<String, Setting>,
    config_ids: Vec<ConfigId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start declaring a setting
    pub fn define<T: SettingValue>(&mut self, key: impl Into<String>, default: T) -> SettingBuilder<'_, T> {
        SettingBuilder {
            registry: self,
            key: key.into(),
            default: default.into_value(),
            options: SettingOptions::default(),
            _marker: PhantomData,
        }
    }

    /// Add an already constructed setting
    pub fn insert(&mut self, setting: Setting) -> ConfigResult<()> {
        if self.settings.contains_key(setting.key()) {
            return Err(ConfigError::DuplicateKey(setting.key().to_string()));
        }
        self.settings.insert(setting.key().to_string(), setting);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.settings.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Remove a setting, its key can be declared again afterwards
    pub fn remove(&mut self, key: &str) -> Option<Setting> {
        self.settings.remove(key)
    }

    /// Change the key of a setting
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> ConfigResult<()> {
        let new = new.into();
        if self.settings.contains_key(&new) {
            return Err(ConfigError::DuplicateKey(new));
        }
        let mut setting = self
            .settings
            .remove(old)
            .ok_or_else(|| ConfigError::UnknownKey(old.to_string()))?;
        setting.set_key(new.clone());
        self.settings.insert(new, setting);
        Ok(())
    }

    /// Config ids which a multi setting has received a value for, in order of first use
    pub fn config_ids(&self) -> &[ConfigId] {
        &self.config_ids
    }

    pub fn add_config_id(&mut self, config_id: ConfigId) {
        if !self.config_ids.contains(&config_id) {
            self.config_ids.push(config_id);
        }
    }

    /// Forget all config ids and every per-id value
    pub fn reset_multi(&mut self) {
        self.config_ids.clear();
        for setting in self.settings.values_mut() {
            setting.clear_group_values();
        }
    }

    pub fn has_multi(&self) -> bool {
        self.settings.values().any(Setting::is_multi)
    }

    /// Store a value for `config_id`, `None` meaning the default id
    pub fn set_value(&mut self, key: &str, config_id: Option<&ConfigId>, value: Value) -> Result<(), ParseError> {
        let setting = self
            .settings
            .get_mut(key)
            .ok_or_else(|| ParseError::InvalidKey(key.to_string()))?;
        setting.set_value(config_id, value)?;
        if setting.is_multi() {
            self.add_config_id(config_id.cloned().unwrap_or_default());
        }
        Ok(())
    }

    pub fn value(&self, key: &str, config_id: Option<&ConfigId>) -> Option<&Value> {
        self.settings.get(key).map(|s| s.get_value(config_id))
    }

    pub fn format_value(&self, key: &str, config_id: Option<&ConfigId>) -> Option<String> {
        self.settings.get(key).map(|s| s.format_value(config_id))
    }
}

/// Declares one setting, see [`Registry::define`]
#[must_use = "a setting is only declared by calling register()"]
pub struct SettingBuilder<'r, T> {
    registry: &'r mut Registry,
    key: String,
    default: Value,
    options: SettingOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: SettingValue> SettingBuilder<'r, T> {
    /// Unit of a number. Required for numbers, may be empty.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.options.unit = Some(unit.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.options.help = Some(Help::Text(help.into()));
        self
    }

    /// A description for each value
    pub fn with_value_help<I, S>(mut self, help: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        S: Into<String>,
    {
        self.options.help = Some(Help::PerValue(
            help.into_iter()
                .map(|(value, text)| (value.into_value(), text.into()))
                .collect(),
        ));
        self
    }

    /// Restrict the values accepted from config files. For lists this restricts the items.
    pub fn with_allowed_values<V, I>(mut self, values: I) -> Self
    where
        V: SettingValue,
        I: IntoIterator<Item = V>,
    {
        self.options.allowed_values = Some(values.into_iter().map(SettingValue::into_value).collect());
        self
    }

    /// Allow different values for different config ids
    pub fn multi(mut self) -> Self {
        self.options.multi = true;
        self
    }

    /// Validate config ids before storing values for them
    pub fn with_config_id_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &ConfigId) -> Result<(), String> + Send + Sync + 'static,
    {
        self.options.check_config_id = Some(Arc::new(check));
        self
    }

    pub fn with_list_separator(mut self, sep: impl Into<String>) -> Self {
        self.options.list_separator = Some(sep.into());
        self
    }

    /// Do not write this setting when saving
    pub fn hidden(mut self) -> Self {
        self.options.hidden = true;
        self
    }

    pub(crate) fn with_parent(mut self, prefix: impl Into<String>) -> Self {
        self.options.parent = Some(prefix.into());
        self
    }

    pub(crate) fn with_shared_check(mut self, check: Option<ConfigIdCheck>) -> Self {
        self.options.check_config_id = check;
        self
    }

    pub fn register(self) -> ConfigResult<SettingHandle<T>> {
        let setting = Setting::new(self.key.clone(), self.default, self.options)?;
        self.registry.insert(setting)?;
        Ok(SettingHandle::new(self.key))
    }
}

/// Typed access to a registered setting
pub struct SettingHandle<T> {
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SettingHandle<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SettingHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SettingHandle").field(&self.key).finish()
    }
}

impl<T: SettingValue> SettingHandle<T> {
    /// A handle for a key which is expected to hold a `T`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self, registry: &Registry) -> ConfigResult<T> {
        self.get_for(registry, None)
    }

    pub fn get_for(&self, registry: &Registry, config_id: Option<&ConfigId>) -> ConfigResult<T> {
        let value = registry
            .value(&self.key, config_id)
            .ok_or_else(|| ConfigError::UnknownKey(self.key.clone()))?;
        T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            key: self.key.clone(),
            expected: T::type_name(),
        })
    }

    /// Set the default value. Allowed values are not checked.
    pub fn set(&self, registry: &mut Registry, value: T) -> ConfigResult<()> {
        self.set_for(registry, None, value)
    }

    pub fn set_for(&self, registry: &mut Registry, config_id: Option<&ConfigId>, value: T) -> ConfigResult<()> {
        if !registry.contains(&self.key) {
            return Err(ConfigError::UnknownKey(self.key.clone()));
        }
        registry.set_value(&self.key, config_id, value.into_value())?;
        Ok(())
    }
}
