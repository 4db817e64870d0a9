//! Property tests for parsing and formatting setting values.

use proptest::prelude::*;

use confline::config::{parse_int, Registry, Value};

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.define("int", 0_i64).register().unwrap();
    registry.define("float", 0.0_f64).register().unwrap();
    registry.define("text", String::new()).register().unwrap();
    registry.define("ints", vec![1_i64]).register().unwrap();
    registry
}

fn format_then_parse(key: &str, value: Value) -> Value {
    let registry = registry();
    let setting = registry.get(key).unwrap();
    setting.parse(&setting.format(&value)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Formatting an integer and parsing it gives the same integer.
    #[test]
    fn property_int_format_parse_inverse(n in any::<i64>()) {
        prop_assert_eq!(format_then_parse("int", Value::Int(n)), Value::Int(n));
    }

    /// PROPERTY: Hexadecimal, octal and binary notations parse to the same number.
    #[test]
    fn property_int_notations_agree(n in any::<i64>()) {
        let sign = if n < 0 { "-" } else { "" };
        let magnitude = n.unsigned_abs();
        prop_assert_eq!(parse_int(&format!("{sign}0x{magnitude:x}")), Ok(n));
        prop_assert_eq!(parse_int(&format!("{sign}0o{magnitude:o}")), Ok(n));
        prop_assert_eq!(parse_int(&format!("{sign}0b{magnitude:b}")), Ok(n));
    }

    /// PROPERTY: Formatting a finite float and parsing it gives the same float.
    #[test]
    fn property_float_format_parse_inverse(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        prop_assert_eq!(format_then_parse("float", Value::Float(x)), Value::Float(x));
    }

    /// PROPERTY: Text survives formatting, including line breaks.
    #[test]
    fn property_text_format_parse_inverse(text in "[^\\\\]{0,30}") {
        let value = Value::Str(text);
        prop_assert_eq!(format_then_parse("text", value.clone()), value);
    }

    /// PROPERTY: Lists keep their items and their order.
    #[test]
    fn property_list_format_parse_inverse(items in proptest::collection::vec(any::<i64>(), 1..8)) {
        let value = Value::List(items.into_iter().map(Value::Int).collect());
        prop_assert_eq!(format_then_parse("ints", value.clone()), value);
    }

    /// PROPERTY: Parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(text in any::<String>()) {
        let registry = registry();
        for key in ["int", "float", "text", "ints"] {
            let _ = registry.get(key).unwrap().parse(&text);
        }
    }
}
