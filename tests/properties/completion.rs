//! Property tests for completing lines.

use proptest::prelude::*;

use confline::config::Registry;
use confline::infrastructure::{FixedDirs, MapEnv, MemoryFs};
use confline::{split_line, ConfigFile, ConfigFileOptions, Ports};

fn config_file() -> ConfigFile {
    let mut registry = Registry::new();
    registry
        .define("color.fg", "auto".to_string())
        .with_allowed_values(["auto", "red", "blue"].map(String::from))
        .register()
        .unwrap();
    registry.define("color.bg", "auto".to_string()).register().unwrap();
    registry.define("width", 80_i64).register().unwrap();
    registry.define("greeting", "hi".to_string()).multi().register().unwrap();
    let ports = Ports::new(MemoryFs::new(), MapEnv::new(), FixedDirs::new("/config"));
    ConfigFile::with_ports(registry, ConfigFileOptions::new("app"), ports)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Completion never panics, wherever the cursor is.
    #[test]
    fn property_completion_never_panics(line in any::<String>(), cursor in 0usize..64) {
        let config_file = config_file();
        let completions = config_file.get_completions(&line, cursor);
        prop_assert!(line.ends_with(&completions.end_of_line));
    }

    /// PROPERTY: Every completed key is read back as `set KEY`.
    #[test]
    fn property_completed_key_splits_into_set_and_key(start in "(c|co|color|color\\.|w|g|)") {
        let config_file = config_file();
        let line = format!("set {start}");
        let completions = config_file.get_completions(&line, line.len());

        prop_assert!(!completions.is_empty());
        for completed in completions.lines() {
            let args = split_line(&completed).unwrap();
            prop_assert_eq!(args.len(), 2);
            prop_assert_eq!(args[0].as_str(), "set");
            prop_assert!(args[1].starts_with(&start));
        }
    }

    /// PROPERTY: Completing a value leaves the key and the rest of the line alone.
    #[test]
    fn property_value_completion_keeps_key(rest in "( width=1|)") {
        let config_file = config_file();
        let line = format!("set color.fg={rest}");
        let cursor = "set color.fg=".len();
        let completions = config_file.get_completions(&line, cursor);

        prop_assert_eq!(completions.candidates.len(), 3);
        for completed in completions.lines() {
            let args = split_line(&completed).unwrap();
            prop_assert!(args[1].starts_with("color.fg="));
            prop_assert!(completed.ends_with(&rest));
        }
    }
}
