//! Scenario: Settings with different values for different objects
//!
//! Journey: An application with several tabs lets the user greet each
//! tab differently. `[id]` lines select the tab the following lines apply to.

use confline::config::ConfigId;
use confline::infrastructure::MapEnv;
use confline::{ConfigFileOptions, SaveOptions};

use crate::common::*;

fn group_value(session: &Session, key: &str, config_id: &str) -> String {
    session
        .config_file
        .registry()
        .format_value(key, Some(&ConfigId::new(config_id)))
        .unwrap()
}

/// SCENARIO: groups select the object, other objects fall back to the default
#[test]
fn scenario_groups_hold_their_own_values() {
    let mut session = Session::new(multi_registry());
    let path = session.write(
        "config",
        "set greeting = hi\n[alpha]\nset greeting = 'hi alpha'\n[beta]\nset greeting = yo\n",
    );

    session.load(&path);

    assert!(session.errors().is_empty(), "{:?}", session.errors());
    assert_eq!(session.value("greeting"), "hi");
    assert_eq!(group_value(&session, "greeting", "alpha"), "hi alpha");
    assert_eq!(group_value(&session, "greeting", "beta"), "yo");
    assert_eq!(group_value(&session, "greeting", "gamma"), "hi");

    let ids: Vec<&str> = session
        .config_file
        .registry()
        .config_ids()
        .iter()
        .map(ConfigId::as_str)
        .collect();
    assert!(ids.contains(&"alpha") && ids.contains(&"beta"), "{ids:?}");
}

/// SCENARIO: application wide settings cannot be changed per object
#[test]
fn scenario_application_wide_setting_in_group() {
    let mut session = Session::new(multi_registry());
    let path = session.write("config", "[alpha]\nset name = y\n");

    session.load(&path);

    assert_eq!(session.value("name"), "x");
    assert_eq!(
        session.errors()[0].message,
        "name cannot be set for specific groups, config id must be the default 'general' not 'alpha'"
    );
}

/// SCENARIO: every file starts in the default group
#[test]
fn scenario_next_file_starts_in_default_group() {
    let mut session = Session::new(multi_registry());
    let first = session.write("first.conf", "[alpha]\nset greeting = a\n");
    let second = session.write("second.conf", "set greeting = b\n");

    session.load(&first);
    session.load(&second);

    assert_eq!(session.value("greeting"), "b");
    assert_eq!(group_value(&session, "greeting", "alpha"), "a");
}

/// SCENARIO: the application refuses ids it does not know
#[test]
fn scenario_config_id_check_rejects_unknown_objects() {
    let options = ConfigFileOptions::new("app").with_config_id_check(|id| {
        if id.as_str().starts_with("tab-") {
            Ok(())
        } else {
            Err(format!("there is no tab called {id}"))
        }
    });
    let mut session = Session::with_options(multi_registry(), options, MapEnv::new());
    let path = session.write("config", "[tab-1]\nset greeting = one\n[window]\nset greeting = w\n");

    session.load(&path);

    let errors = session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "there is no tab called window");
    assert_eq!(errors[0].line, "[window]");
    assert_eq!(group_value(&session, "greeting", "tab-1"), "one");
}

/// SCENARIO: groups survive a save and load
#[test]
fn scenario_groups_are_saved() {
    let mut session = Session::new(multi_registry());
    assert!(session.config_file.parse_line("[alpha]"));
    assert!(session.config_file.parse_line("set greeting = 'hi alpha'"));

    let options = SaveOptions::new().with_keys(["greeting"]).with_comments(false);
    let path = session.config_file.save(&options).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "set greeting = hello\n\n[alpha]\nset greeting = 'hi alpha'\n");

    let mut reloaded = Session::new(multi_registry());
    reloaded.load(&path);
    assert_eq!(group_value(&reloaded, "greeting", "alpha"), "hi alpha");
}
