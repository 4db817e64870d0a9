//! Scenario: An application with a restricted color setting
//!
//! Journey: The user changes the foreground color in the config file,
//! then overrides it through an environment variable.

use confline::infrastructure::MapEnv;
use confline::notify::Message;

use crate::common::*;

/// SCENARIO: `set color.fg = red` in the config file
#[test]
fn scenario_config_file_sets_allowed_value() {
    let mut session = Session::new(color_registry());
    let path = session.write("config", "set color.fg = red\n");

    session.config_file.load(false).unwrap();

    assert_eq!(session.value("color.fg"), "red");
    assert!(session.errors().is_empty(), "{:?}", session.errors());
    assert_eq!(session.infos(), vec!["set color.fg to red"]);
    assert_eq!(
        session.messages()[0].file_name.as_deref(),
        Some(path.display().to_string().as_str())
    );
}

/// SCENARIO: a value outside the allowed values is reported with its line
#[test]
fn scenario_config_file_rejects_other_values() {
    let mut session = Session::new(color_registry());
    let path = session.write("config", "# theme\nset color.fg = green\nset width = 100\n");

    session.load(&path);

    assert_eq!(session.value("color.fg"), "auto");
    assert_eq!(session.value("width"), "100");
    let errors = session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].format_msg_line(),
        "invalid value for color.fg: 'green' (should be one of auto, red, blue) in line 2 'set color.fg = green'"
    );
}

/// SCENARIO: `APP_COLOR_FG=blue` overrides the default
#[test]
fn scenario_environment_variable_sets_value() {
    let env = MapEnv::with([("APP_COLOR_FG", "blue"), ("PATH", "/usr/bin")]);
    let mut session = Session::with_env(color_registry(), env);

    session.config_file.load_env().unwrap();

    assert_eq!(session.value("color.fg"), "blue");
    assert_eq!(session.infos(), vec!["set color.fg to blue"]);
    assert_eq!(
        session.messages()[0].file_name.as_deref(),
        Some(Message::ENVIRONMENT_VARIABLES)
    );
}

/// SCENARIO: `APP_COLOR_FG=green` is reported and changes nothing
#[test]
fn scenario_environment_variable_with_invalid_value() {
    let env = MapEnv::with([("APP_COLOR_FG", "green")]);
    let mut session = Session::with_env(color_registry(), env);

    session.config_file.load_env().unwrap();

    assert_eq!(session.value("color.fg"), "auto");
    let errors = session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "invalid value for color.fg: 'green' (should be one of auto, red, blue) \
         while trying to parse environment variable APP_COLOR_FG='green'"
    );
}

/// SCENARIO: the environment is loaded after the file and wins
#[test]
fn scenario_environment_overrides_config_file() {
    let env = MapEnv::with([("APP_WIDTH", "0x40")]);
    let mut session = Session::with_env(color_registry(), env);
    session.write("config", "set width = 100\nset color.fg = red\n");

    session.config_file.load(true).unwrap();

    assert_eq!(session.value("width"), "64");
    assert_eq!(session.value("color.fg"), "red");
    assert!(session.errors().is_empty());
}
