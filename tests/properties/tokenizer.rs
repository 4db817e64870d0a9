//! Property tests for splitting and quoting lines.

use proptest::prelude::*;

use confline::{quote, split_line};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A quoted value is read back as exactly that one argument.
    #[test]
    fn property_quote_is_inverse_of_split(value in any::<String>()) {
        let quoted = quote(&value);
        prop_assert_eq!(split_line(&quoted).unwrap(), vec![value]);
    }

    /// PROPERTY: Quoted arguments joined by spaces split into the same arguments.
    #[test]
    fn property_quoted_line_splits_into_arguments(
        args in proptest::collection::vec(".{0,12}", 0..6),
    ) {
        let line = args.iter().map(|a| quote(a)).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(split_line(&line).unwrap(), args);
    }

    /// PROPERTY: Splitting arbitrary input never panics.
    #[test]
    fn property_split_line_never_panics(line in any::<String>()) {
        let _ = split_line(&line);
        let _ = confline::parser::split_line_lenient(&line);
    }

    /// PROPERTY: Values which need no quotes are not quoted.
    #[test]
    fn property_plain_values_stay_unquoted(value in "[a-zA-Z0-9_.,:%$=+-]{1,20}") {
        prop_assert_eq!(quote(&value), value);
    }
}
