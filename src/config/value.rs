//! Typed values and the closed set of value kinds
//!
//! The kind of a setting is fixed when it is declared, derived from its default
//! value. Parsing and formatting dispatch on [`ValueKind`] once instead of
//! inspecting the value at runtime.

use std::fmt;
use std::sync::Arc;

/// Literal used for `true` in config files
pub const VALUE_TRUE: &str = "true";
/// Literal used for `false` in config files
pub const VALUE_FALSE: &str = "false";
/// Default separator between list items
pub const LIST_SEP: &str = ",";

pub(crate) const HELP_STR: &str =
    "A text. If it contains spaces it must be wrapped in single or double quotes.";
pub(crate) const HELP_INT: &str = "An integer number as decimal (e.g. 42), hexadecimal (e.g. 0x2a), octal (e.g. 0o52) or binary (e.g. 0b101010). \
Leading zeroes are not permitted to avoid confusion with other notations for octal numbers. \
It is permissible to group digits with underscores for better readability, e.g. 1_000_000.";
pub(crate) const HELP_FLOAT: &str =
    "A floating point number, e.g. 23, 1.414, -1e3, 3.14_15_93.";

/// An enumeration type whose variants are written in lower case with hyphens
#[derive(Debug, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    variants: Vec<String>,
}

impl EnumType {
    /// Declare an enum type. Variant names are normalised with [`format_variant_name`].
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Arc::new(Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|v| format_variant_name(v.as_ref()))
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Look up a variant by its formatted name
    pub fn value(self: &Arc<Self>, name: &str) -> Option<EnumValue> {
        self.variants
            .iter()
            .position(|v| v == name)
            .map(|index| EnumValue {
                ty: Arc::clone(self),
                index,
            })
    }
}

/// One variant of an [`EnumType`]
#[derive(Debug, Clone)]
pub struct EnumValue {
    ty: Arc<EnumType>,
    index: usize,
}

impl EnumValue {
    pub fn name(&self) -> &str {
        &self.ty.variants[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.ty
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.ty.name == other.ty.name
    }
}

/// Converts user input into the canonical text of a custom value
pub type CustomParser = fn(&str) -> Result<String, String>;

/// A user defined type which is stored as its canonical text
#[derive(Debug)]
pub struct CustomType {
    name: String,
    help: String,
    parse: CustomParser,
}

impl CustomType {
    pub fn new(name: impl Into<String>, help: impl Into<String>, parse: CustomParser) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            help: help.into(),
            parse,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Parse user input into a value of this type
    pub fn value(self: &Arc<Self>, text: &str) -> Result<CustomValue, String> {
        let text = (self.parse)(text)?;
        Ok(CustomValue {
            ty: Arc::clone(self),
            text,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CustomValue {
    ty: Arc<CustomType>,
    text: String,
}

impl CustomValue {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn custom_type(&self) -> &Arc<CustomType> {
        &self.ty
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.ty.name == other.ty.name
    }
}

/// A typed setting value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Enum(EnumValue),
    List(Vec<Value>),
    Custom(CustomValue),
}

impl Value {
    /// The kind of this value, `None` for an empty list
    pub fn kind(&self) -> Option<ValueKind> {
        Some(match self {
            Value::Str(_) => ValueKind::Str,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Enum(v) => ValueKind::Enum(Arc::clone(&v.ty)),
            Value::Custom(v) => ValueKind::Custom(Arc::clone(&v.ty)),
            Value::List(items) => ValueKind::List(Box::new(items.first()?.kind()?)),
        })
    }

    /// Check whether this value can be stored in a setting of `kind`
    pub fn matches_kind(&self, kind: &ValueKind) -> bool {
        match (self, kind) {
            (Value::Str(_), ValueKind::Str)
            | (Value::Int(_), ValueKind::Int)
            | (Value::Float(_), ValueKind::Float)
            | (Value::Bool(_), ValueKind::Bool) => true,
            (Value::Enum(v), ValueKind::Enum(t)) => v.ty.name == t.name,
            (Value::Custom(v), ValueKind::Custom(t)) => v.ty.name == t.name,
            (Value::List(items), ValueKind::List(item)) => {
                items.iter().all(|v| v.matches_kind(item))
            }
            _ => false,
        }
    }

    /// Plain stringification of the underlying value
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Custom(v) => v.text.clone(),
            Value::List(_) => self.to_repr(false),
            other => other.to_string(),
        }
    }

    /// Quoted, escaped representation of the underlying value.
    /// With `ascii_only` every non ASCII character is escaped as well.
    pub fn to_repr(&self, ascii_only: bool) -> String {
        match self {
            Value::Str(s) => quote_repr(s, ascii_only),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Bool(b) => b.to_string(),
            Value::Enum(v) => format!("{}::{}", v.ty.name, v.name()),
            Value::Custom(v) => format!("{}({})", v.ty.name, quote_repr(&v.text, ascii_only)),
            Value::List(items) => {
                let inner = items
                    .iter()
                    .map(|v| v.to_repr(ascii_only))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{inner}]")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(true) => f.write_str(VALUE_TRUE),
            Value::Bool(false) => f.write_str(VALUE_FALSE),
            Value::Enum(v) => f.write_str(v.name()),
            Value::Custom(v) => f.write_str(&v.text),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(LIST_SEP)?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// The declared type of a setting
#[derive(Debug, Clone)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    Enum(Arc<EnumType>),
    List(Box<ValueKind>),
    Custom(Arc<CustomType>),
}

impl ValueKind {
    /// Name of the type as shown in help texts
    pub fn type_name(&self) -> String {
        match self {
            ValueKind::Str => "str".to_string(),
            ValueKind::Int => "int".to_string(),
            ValueKind::Float => "float".to_string(),
            ValueKind::Bool => "bool".to_string(),
            ValueKind::Enum(t) => t.name.clone(),
            ValueKind::Custom(t) => t.name.clone(),
            ValueKind::List(item) => format!("list of {}", item.type_name()),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueKind::List(_))
    }

    /// The kind of the items for lists, the kind itself otherwise
    pub fn item_kind(&self) -> &ValueKind {
        match self {
            ValueKind::List(item) => item,
            other => other,
        }
    }

    /// Numbers and lists of numbers must declare a unit
    pub fn needs_unit(&self) -> bool {
        matches!(self.item_kind(), ValueKind::Int | ValueKind::Float)
    }

    /// Explanation of the syntax of this type for the data types section.
    /// Enums and bools explain themselves through their allowed values.
    pub fn type_help(&self) -> Option<&str> {
        match self.item_kind() {
            ValueKind::Str => Some(HELP_STR),
            ValueKind::Int => Some(HELP_INT),
            ValueKind::Float => Some(HELP_FLOAT),
            ValueKind::Custom(t) => Some(&t.help),
            _ => None,
        }
    }
}

impl PartialEq for ValueKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueKind::Str, ValueKind::Str)
            | (ValueKind::Int, ValueKind::Int)
            | (ValueKind::Float, ValueKind::Float)
            | (ValueKind::Bool, ValueKind::Bool) => true,
            (ValueKind::Enum(a), ValueKind::Enum(b)) => a.name == b.name,
            (ValueKind::Custom(a), ValueKind::Custom(b)) => a.name == b.name,
            (ValueKind::List(a), ValueKind::List(b)) => a == b,
            _ => false,
        }
    }
}

/// Convert a variant name to the form used in config files:
/// lower case, words separated by hyphens.
///
/// `HIGH_CONTRAST`, `high_contrast` and `HighContrast` all become `high-contrast`.
pub fn format_variant_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c == '_' {
            out.push('-');
        } else if c.is_uppercase() {
            if matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Parse an integer the way source code literals are written:
/// optional sign, `0x`/`0o`/`0b` prefixes, underscores between digits.
pub fn parse_int(text: &str) -> Result<i64, String> {
    let invalid = || format!("invalid integer literal '{text}'");
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };

    // a prefix may be followed by one underscore: 0x_ff
    let digits = if radix != 10 {
        digits.strip_prefix('_').unwrap_or(digits)
    } else {
        digits
    };
    let cleaned = strip_digit_separators(digits).ok_or_else(invalid)?;

    if radix == 10 && cleaned.len() > 1 && cleaned.starts_with('0') && cleaned.bytes().any(|b| b != b'0')
    {
        return Err(invalid());
    }

    let magnitude = u64::from_str_radix(&cleaned, radix).map_err(|_| invalid())?;
    if negative {
        if magnitude <= i64::MAX as u64 + 1 {
            Ok((magnitude as i128).wrapping_neg() as i64)
        } else {
            Err(invalid())
        }
    } else {
        i64::try_from(magnitude).map_err(|_| invalid())
    }
}

/// Parse a floating point number, allowing underscores between digits
pub fn parse_float(text: &str) -> Result<f64, String> {
    let invalid = || format!("invalid float literal '{text}'");
    let trimmed = text.trim();
    let cleaned = if trimmed.contains('_') {
        let mut out = String::with_capacity(trimmed.len());
        let chars: Vec<char> = trimmed.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if c == '_' {
                let before = i.checked_sub(1).map(|j| chars[j]);
                let after = chars.get(i + 1).copied();
                if !matches!(before, Some(b) if b.is_ascii_digit())
                    || !matches!(after, Some(a) if a.is_ascii_digit())
                {
                    return Err(invalid());
                }
            } else {
                out.push(c);
            }
        }
        out
    } else {
        trimmed.to_string()
    };
    cleaned.parse::<f64>().map_err(|_| invalid())
}

/// Remove single underscores between digits, `None` if misplaced
fn strip_digit_separators(digits: &str) -> Option<String> {
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(digits.replace('_', ""))
}

fn quote_repr(s: &str, ascii_only: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || (ascii_only && !c.is_ascii()) => {
                out.push_str(&format!("\\u{{{:x}}}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_variant_name() {
        assert_eq!(format_variant_name("HIGH_CONTRAST"), "high-contrast");
        assert_eq!(format_variant_name("HighContrast"), "high-contrast");
        assert_eq!(format_variant_name("dark"), "dark");
        assert_eq!(format_variant_name("Utf8Mode"), "utf8-mode");
    }

    #[test]
    fn test_parse_int_bases() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("0x2a"), Ok(42));
        assert_eq!(parse_int("0X2A"), Ok(42));
        assert_eq!(parse_int("0o52"), Ok(42));
        assert_eq!(parse_int("0b101010"), Ok(42));
        assert_eq!(parse_int("-0x2a"), Ok(-42));
        assert_eq!(parse_int("1_000_000"), Ok(1_000_000));
        assert_eq!(parse_int("0x_ff"), Ok(255));
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("000"), Ok(0));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
    }

    #[test]
    fn test_parse_int_rejects_invalid() {
        assert!(parse_int("042").is_err());
        assert!(parse_int("1__0").is_err());
        assert!(parse_int("_1").is_err());
        assert!(parse_int("1_").is_err());
        assert!(parse_int("abc").is_err());
        assert!(parse_int("").is_err());
        assert!(parse_int("0x").is_err());
        assert!(parse_int("9223372036854775808").is_err());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1.414"), Ok(1.414));
        assert_eq!(parse_float("-1e3"), Ok(-1000.0));
        assert_eq!(parse_float("3.14_15"), Ok(3.1415));
        assert_eq!(parse_float("23"), Ok(23.0));
        assert!(parse_float("3._14").is_err());
        assert!(parse_float("pi").is_err());
    }

    #[test]
    fn test_value_kind_from_default() {
        assert_eq!(Value::from("x").kind(), Some(ValueKind::Str));
        assert_eq!(
            Value::List(vec![Value::Int(1)]).kind(),
            Some(ValueKind::List(Box::new(ValueKind::Int)))
        );
        assert_eq!(Value::List(Vec::new()).kind(), None);
    }

    #[test]
    fn test_needs_unit() {
        assert!(ValueKind::Int.needs_unit());
        assert!(ValueKind::List(Box::new(ValueKind::Float)).needs_unit());
        assert!(!ValueKind::Str.needs_unit());
        assert!(!ValueKind::Bool.needs_unit());
    }

    #[test]
    fn test_enum_lookup() {
        let theme = EnumType::new("theme", ["DARK", "LIGHT", "HIGH_CONTRAST"]);
        let value = theme.value("high-contrast").unwrap();
        assert_eq!(value.name(), "high-contrast");
        assert_eq!(value.index(), 2);
        assert!(theme.value("HIGH_CONTRAST").is_none());
    }

    #[test]
    fn test_display_and_repr() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.to_string(), "a,b");
        assert_eq!(list.to_repr(false), "['a', 'b']");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("é").to_repr(true), "'\\u{e9}'");
        assert_eq!(Value::from("it's").to_repr(false), "'it\\'s'");
    }

    #[test]
    fn test_custom_type() {
        fn parse_hex_color(s: &str) -> Result<String, String> {
            let digits = s.strip_prefix('#').ok_or("missing #")?;
            if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                Ok(format!("#{}", digits.to_ascii_lowercase()))
            } else {
                Err("expected six hex digits".to_string())
            }
        }
        let color = CustomType::new("color", "A color like #ff0000.", parse_hex_color);
        assert_eq!(color.value("#FF0000").unwrap().text(), "#ff0000");
        assert!(color.value("red").is_err());
    }
}
