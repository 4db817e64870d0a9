//! A family of settings sharing a key prefix

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};

use super::registry::{ConfigEnum, ConfigId, Registry, SettingHandle, SettingValue};
use super::setting::ConfigIdCheck;
use super::value::{format_variant_name, Value, VALUE_FALSE, VALUE_TRUE};

/// A key of a [`DictConfig`]
pub trait DictKey: Clone + PartialEq {
    /// The part of the setting key after the prefix
    fn format_key(&self) -> String;
}

impl DictKey for bool {
    fn format_key(&self) -> String {
        let s = if *self { VALUE_TRUE } else { VALUE_FALSE };
        s.to_string()
    }
}

impl DictKey for String {
    fn format_key(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_dict_key_for_int {
    ($($t:ty),*) => {
        $(impl DictKey for $t {
            fn format_key(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_dict_key_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl<E: ConfigEnum + PartialEq> DictKey for E {
    fn format_key(&self) -> String {
        format_variant_name(self.variant_name())
    }
}

/// Several settings which belong together, accessed like a map.
///
/// Every entry is registered as `PREFIX.KEY`. Keys listed with
/// [`DictConfig::ignore_keys`] are kept here and never reach the registry,
/// so they cannot be changed from a config file.
pub struct DictConfig<K, T> {
    prefix: String,
    entries: Vec<(K, SettingHandle<T>)>,
    ignored: Vec<(K, T)>,
    ignore_keys: Vec<K>,
    unit: Option<String>,
    help: Option<String>,
    allowed_values: Option<Vec<Value>>,
    multi: bool,
    check_config_id: Option<ConfigIdCheck>,
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for DictConfig<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictConfig")
            .field("prefix", &self.prefix)
            .field("entries", &self.entries)
            .field("ignored", &self.ignored)
            .field("multi", &self.multi)
            .finish_non_exhaustive()
    }
}

impl<K: DictKey, T: SettingValue + Clone> DictConfig<K, T> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
            ignored: Vec::new(),
            ignore_keys: Vec::new(),
            unit: None,
            help: None,
            allowed_values: None,
            multi: false,
            check_config_id: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_allowed_values<I: IntoIterator<Item = T>>(mut self, values: I) -> Self {
        self.allowed_values = Some(values.into_iter().map(SettingValue::into_value).collect());
        self
    }

    /// Entries with these keys are not exposed to config files
    pub fn ignore_keys<I: IntoIterator<Item = K>>(mut self, keys: I) -> Self {
        self.ignore_keys = keys.into_iter().collect();
        self
    }

    /// Make every entry a multi setting
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Passed on to every entry, implies [`DictConfig::multi`]
    pub fn with_config_id_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &ConfigId) -> Result<(), String> + Send + Sync + 'static,
    {
        self.multi = true;
        self.check_config_id = Some(Arc::new(check));
        self
    }

    /// Register one setting per default value
    pub fn build<I>(mut self, registry: &mut Registry, defaults: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, T)>,
    {
        for (key, value) in defaults {
            self.insert(registry, key, value)?;
        }
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// The key of the setting for `key`
    pub fn format_key(&self, key: &K) -> String {
        format!("{}.{}", self.prefix, key.format_key())
    }

    fn is_ignored(&self, key: &K) -> bool {
        self.ignore_keys.contains(key)
    }

    fn handle(&self, key: &K) -> Option<&SettingHandle<T>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, h)| h)
    }

    /// Set the default value of an entry, declaring the setting if it is new
    pub fn insert(&mut self, registry: &mut Registry, key: K, value: T) -> ConfigResult<()> {
        if self.is_ignored(&key) {
            match self.ignored.iter_mut().find(|(k, _)| *k == key) {
                Some((_, v)) => *v = value,
                None => self.ignored.push((key, value)),
            }
            return Ok(());
        }

        if let Some(handle) = self.handle(&key) {
            return handle.set(registry, value);
        }

        let handle = self.declare(registry, &key, value)?;
        self.entries.push((key, handle));
        Ok(())
    }

    fn declare(&self, registry: &mut Registry, key: &K, value: T) -> ConfigResult<SettingHandle<T>> {
        let mut builder = registry
            .define(self.format_key(key), value)
            .with_parent(self.prefix.clone())
            .with_shared_check(self.check_config_id.clone());
        if let Some(unit) = &self.unit {
            builder = builder.with_unit(unit.clone());
        }
        if let Some(help) = &self.help {
            builder = builder.with_help(help.clone());
        }
        if let Some(allowed) = &self.allowed_values {
            builder = builder.with_allowed_values(allowed.iter().cloned());
        }
        if self.multi {
            builder = builder.multi();
        }
        builder.register()
    }

    /// The default value of an entry
    pub fn get(&self, registry: &Registry, key: &K) -> ConfigResult<T> {
        self.get_for(registry, key, None)
    }

    /// The value of an entry for `config_id`
    pub fn get_for(&self, registry: &Registry, key: &K, config_id: Option<&ConfigId>) -> ConfigResult<T> {
        if self.is_ignored(key) {
            return self
                .ignored
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| ConfigError::UnknownKey(self.format_key(key)));
        }
        match self.handle(key) {
            Some(handle) => handle.get_for(registry, config_id),
            None => Err(ConfigError::UnknownKey(self.format_key(key))),
        }
    }

    /// Set the value of an entry for `config_id`, declaring the setting if it is new
    pub fn set_for(
        &mut self,
        registry: &mut Registry,
        key: K,
        config_id: Option<&ConfigId>,
        value: T,
    ) -> ConfigResult<()> {
        if self.is_ignored(&key) {
            return Err(ConfigError::IgnoredKey(key.format_key()));
        }
        if let Some(handle) = self.handle(&key) {
            return handle.set_for(registry, config_id, value);
        }
        let handle = self.declare(registry, &key, value.clone())?;
        let result = handle.set_for(registry, config_id, value);
        self.entries.push((key, handle));
        result
    }

    pub fn contains(&self, key: &K) -> bool {
        if self.is_ignored(key) {
            self.ignored.iter().any(|(k, _)| k == key)
        } else {
            self.handle(key).is_some()
        }
    }

    /// Dict keys, registered entries first, then ignored ones
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries
            .iter()
            .map(|(k, _)| k)
            .chain(self.ignored.iter().map(|(k, _)| k))
    }

    /// Keys of the registered settings
    pub fn iter_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, h)| h.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_keys() {
        let mut registry = Registry::new();
        let alias = DictConfig::new("alias")
            .build(&mut registry, [(true, "y".to_string()), (false, "n".to_string())])
            .unwrap();
        assert!(registry.contains("alias.true"));
        assert!(registry.contains("alias.false"));
        assert_eq!(alias.get(&registry, &true).unwrap(), "y");
        assert_eq!(
            registry.get("alias.true").unwrap().parent(),
            Some("alias")
        );
    }

    #[test]
    fn test_ignored_keys_bypass_registry() {
        let mut registry = Registry::new();
        let mut keys = DictConfig::new("key")
            .ignore_keys(["quit".to_string()])
            .build(
                &mut registry,
                [
                    ("quit".to_string(), "q".to_string()),
                    ("help".to_string(), "h".to_string()),
                ],
            )
            .unwrap();
        assert!(!registry.contains("key.quit"));
        assert!(registry.contains("key.help"));
        assert_eq!(keys.get(&registry, &"quit".to_string()).unwrap(), "q");

        keys.insert(&mut registry, "quit".to_string(), "x".to_string()).unwrap();
        assert_eq!(keys.get(&registry, &"quit".to_string()).unwrap(), "x");

        let err = keys
            .set_for(&mut registry, "quit".to_string(), Some(&ConfigId::from("a")), "z".to_string())
            .unwrap_err();
        assert!(matches!(err, ConfigError::IgnoredKey(k) if k == "quit"));
        assert_eq!(keys.iter_keys().collect::<Vec<_>>(), vec!["key.help"]);
        assert_eq!(keys.keys().count(), 2);
    }

    #[test]
    fn test_multi_dict_per_group_values() {
        let mut registry = Registry::new();
        let mut widths = DictConfig::new("width")
            .with_unit("px")
            .multi()
            .build(&mut registry, [(1_i64, 10_i64), (2, 20)])
            .unwrap();
        let left = ConfigId::from("left");
        widths.set_for(&mut registry, 1, Some(&left), 15).unwrap();
        assert_eq!(widths.get_for(&registry, &1, Some(&left)).unwrap(), 15);
        assert_eq!(widths.get(&registry, &1).unwrap(), 10);
        assert_eq!(widths.get_for(&registry, &2, Some(&left)).unwrap(), 20);
        assert_eq!(registry.config_ids(), &[left]);
    }

    #[test]
    fn test_missing_unit_propagates() {
        let mut registry = Registry::new();
        let err = DictConfig::<String, i64>::new("size")
            .build(&mut registry, [("a".to_string(), 1)])
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingUnit(_)));
    }
}
