//! Scenario: Writing the configuration back
//!
//! Journey: The user changes settings interactively, the application
//! saves them, and the next start loads exactly the same values.

use confline::SaveOptions;

use crate::common::*;

/// SCENARIO: saving creates the config directory and writes every setting
#[test]
fn scenario_save_writes_default_config_file() {
    let mut session = Session::new(color_registry());
    assert!(session.config_file.parse_line("set color.fg = blue"));
    assert!(session.config_file.parse_line("set width=120 name='two words'"));
    std::fs::remove_dir(session.dir.path()).unwrap();

    let path = session
        .config_file
        .save(&SaveOptions::new().with_comments(false))
        .unwrap();

    assert_eq!(path, session.path("config"));
    let text = std::fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(text, @r"
    set color.fg = blue
    set name = 'two words'
    set width = 120
    ");
}

/// SCENARIO: save then load is a fixed point, including values which look like references
#[test]
fn scenario_save_and_load_round_trip() {
    let mut session = Session::new(color_registry());
    for line in [
        "set color.fg = red",
        "set --raw name = '50% of ${HOME} and it''s %width%'",
        "set width = -0x10",
    ] {
        assert!(session.config_file.parse_line(line), "{line}");
    }
    let path = session.config_file.save(&SaveOptions::default()).unwrap();

    let mut reloaded = Session::new(color_registry());
    reloaded.load(&path);

    assert!(reloaded.errors().is_empty(), "{:?}", reloaded.errors());
    for key in ["color.fg", "name", "width"] {
        assert_eq!(reloaded.value(key), session.value(key), "{key}");
    }
    assert_eq!(reloaded.value("name"), "50% of ${HOME} and its %width%");
    assert_eq!(reloaded.value("width"), "-16");
}

/// SCENARIO: an existing writable file is preferred to the first candidate
#[test]
fn scenario_save_updates_existing_file() {
    let mut session = Session::new(color_registry());
    let path = session.write("config", "set width = 1\n");
    session.load(&path);

    let saved = session.config_file.save(&SaveOptions::new()).unwrap();

    assert_eq!(saved, path);
    let text = std::fs::read_to_string(&saved).unwrap();
    assert!(text.contains("# color.fg\n# --------\n# one of auto, red, blue\n# Foreground color\n"), "{text}");
    assert!(text.contains("set width = 1\n"), "{text}");
}
