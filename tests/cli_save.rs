mod common;

use common::*;

#[test]
fn test_save_creates_user_config() {
    let env = TestEnv::with_demo_schema();

    let result = env.run(&["save", "schema.toml", "--no-comments"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let path = env.user_config_file();
    assert_output_contains!(result, &format!("Saved {}", path.display()));
    assert_eq!(
        env.read(&path),
        "set color.fg = auto\nset editor = vi\nset width = 80\n"
    );
}

#[test]
fn test_save_keeps_loaded_values() {
    let env = TestEnv::with_demo_schema();
    let path = env.write_user_config("set width = 100\n");

    let result = env.run(&["save", "schema.toml", "--no-comments"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(
        env.read(&path),
        "set color.fg = auto\nset editor = vi\nset width = 100\n"
    );
}

#[test]
fn test_save_to_output_with_comments() {
    let env = TestEnv::with_demo_schema();

    let result = env.run(&["save", "schema.toml", "-o", "out/demo.conf"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let text = env.read(&env.path("out/demo.conf"));
    assert!(
        text.contains("# color.fg\n# --------\n# one of auto, red, blue\n# Foreground color\nset color.fg = auto\n"),
        "{text}"
    );
    assert!(text.ends_with("set width = 80\n"), "{text}");
    assert!(!env.user_config_file().exists());
}
