//! Scenario: A family of settings sharing a prefix
//!
//! Journey: An application maps boolean answers to the text it shows.
//! The user changes both texts in one line and saves the result.

use confline::config::{DictConfig, Registry};
use confline::SaveOptions;

use crate::common::*;

fn alias_registry() -> (Registry, DictConfig<bool, String>, DictConfig<String, String>) {
    let mut registry = Registry::new();
    let alias = DictConfig::new("alias")
        .with_help("Text shown for an answer")
        .build(&mut registry, [(true, "y".to_string()), (false, "n".to_string())])
        .unwrap();
    let keys = DictConfig::new("key")
        .ignore_keys(["quit".to_string()])
        .build(
            &mut registry,
            [
                ("quit".to_string(), "q".to_string()),
                ("help".to_string(), "h".to_string()),
            ],
        )
        .unwrap();
    registry.define("name", "x".to_string()).register().unwrap();
    (registry, alias, keys)
}

/// SCENARIO: `DictConfig("alias", {true: "y", false: "n"})`
#[test]
fn scenario_dict_registers_one_key_per_entry() {
    let (registry, alias, _) = alias_registry();

    assert!(registry.contains("alias.true"));
    assert!(registry.contains("alias.false"));
    assert_eq!(alias.format_key(&false), "alias.false");
    assert_eq!(alias.get(&registry, &false).unwrap(), "n");
}

/// SCENARIO: the entries are changed from a config file
#[test]
fn scenario_dict_entries_are_set_from_file() {
    let (registry, alias, keys) = alias_registry();
    let mut session = Session::new(registry);
    let path = session.write("config", "set alias.true=yes alias.false=no\nset key.help = H\n");

    session.load(&path);

    assert!(session.errors().is_empty(), "{:?}", session.errors());
    let registry = session.config_file.registry();
    assert_eq!(alias.get(registry, &true).unwrap(), "yes");
    assert_eq!(alias.get(registry, &false).unwrap(), "no");
    assert_eq!(keys.get(registry, &"help".to_string()).unwrap(), "H");
}

/// SCENARIO: ignored keys cannot be reached from a config file
#[test]
fn scenario_dict_ignored_keys_are_unknown() {
    let (registry, _, keys) = alias_registry();
    let mut session = Session::new(registry);

    assert!(!session.config_file.parse_line("set key.quit = x"));

    assert_eq!(session.errors()[0].message, "invalid key 'key.quit'");
    let registry = session.config_file.registry();
    assert_eq!(keys.get(registry, &"quit".to_string()).unwrap(), "q");
}

/// SCENARIO: the entries share one explanation when saved
#[test]
fn scenario_dict_is_saved_under_its_prefix() {
    let (registry, _, _) = alias_registry();
    let session = Session::new(registry);

    let text = session
        .config_file
        .save_to_string(&SaveOptions::new().with_keys(["alias"]))
        .unwrap();
    assert_eq!(text.matches("# alias\n").count(), 1, "{text}");
    assert!(text.contains("# Text shown for an answer\n"), "{text}");
    assert!(
        text.ends_with("set alias.false = n\nset alias.true = y\n"),
        "{text}"
    );

    let text = session
        .config_file
        .save_to_string(&SaveOptions::new().ignoring(["alias", "key"]).with_comments(false))
        .unwrap();
    assert_eq!(text, "set name = x\n");
}
