//! Settings registry
//!
//! Settings are declared once through [`Registry::define`] and live as long as
//! the registry. Config files and environment variables change them in place.
//!
//! ```
//! use confline::config::Registry;
//!
//! let mut registry = Registry::new();
//! let width = registry
//!     .define("ui.width", 80_i64)
//!     .with_unit("columns")
//!     .with_help("Width of the main window")
//!     .register()
//!     .unwrap();
//! assert_eq!(width.get(&registry).unwrap(), 80);
//! ```

mod dict;
mod registry;
mod setting;
mod value;

pub use dict::{DictConfig, DictKey};
pub use registry::{
    ConfigEnum, ConfigId, Registry, SettingBuilder, SettingHandle, SettingValue, DEFAULT_CONFIG_ID,
};
pub use setting::{ConfigIdCheck, Help, Setting, SettingOptions};
pub use value::{
    format_variant_name, parse_float, parse_int, CustomParser, CustomType, CustomValue, EnumType,
    EnumValue, Value, ValueKind, LIST_SEP, VALUE_FALSE, VALUE_TRUE,
};
