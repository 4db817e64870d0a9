//! Scenario: A config file split over several files
//!
//! Journey: The user keeps colors in a separate file and shares a base
//! file between machines. One day two files include each other.

use crate::common::*;

/// SCENARIO: relative includes are resolved against the including file
#[test]
fn scenario_nested_relative_includes() {
    let mut session = Session::new(color_registry());
    let main = session.write("app/config", "include colors.conf\nset width = 100\n");
    session.write("app/colors.conf", "set color.fg = blue\ninclude ../shared/base.conf\n");
    session.write("shared/base.conf", "set name = 'from base'\n");

    session.load(&main);

    assert!(session.errors().is_empty(), "{:?}", session.errors());
    assert_eq!(session.value("color.fg"), "blue");
    assert_eq!(session.value("name"), "from base");
    assert_eq!(session.value("width"), "100");
}

/// SCENARIO: errors name the included file and its line
#[test]
fn scenario_errors_in_included_file_are_attributed() {
    let mut session = Session::new(color_registry());
    let main = session.write("config", "include colors.conf\nset width = x\n");
    let colors = session.write("colors.conf", "\nset color.fg = green\n");

    session.load(&main);

    let errors = session.errors();
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert_eq!(errors[0].file_name.as_deref(), Some(colors.display().to_string().as_str()));
    assert_eq!(errors[0].line_number, Some(2));
    assert_eq!(errors[1].file_name.as_deref(), Some(main.display().to_string().as_str()));
    assert_eq!(errors[1].line_number, Some(2));
}

/// SCENARIO: a cycle is reported and the values loaded so far stay
#[test]
fn scenario_include_cycle_keeps_loaded_values() {
    let mut session = Session::new(color_registry());
    let a = session.write("a.conf", "set color.fg = red\ninclude b.conf\nset width = 7\n");
    session.write("b.conf", "set name = b\ninclude a.conf\n");

    session.load(&a);

    assert_eq!(session.value("color.fg"), "red");
    assert_eq!(session.value("name"), "b");
    assert_eq!(session.value("width"), "7");
    let errors = session.errors();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(
        errors[0].message.starts_with("circular include of file"),
        "{}",
        errors[0].message
    );
}

/// SCENARIO: a missing file is an error of the include line only
#[test]
fn scenario_missing_include_is_recoverable() {
    let mut session = Session::new(color_registry());
    let main = session.write("config", "include nowhere.conf\nset color.fg = red\n");

    session.load(&main);

    assert_eq!(session.value("color.fg"), "red");
    let errors = session.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("no such file"), "{}", errors[0].message);
    assert_eq!(errors[0].line_number, Some(1));
}
