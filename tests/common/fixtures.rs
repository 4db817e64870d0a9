//! Test fixtures - reusable registries, schemas and config files.

use confline::config::Registry;

/// Application name of the demo schema, its variables start with `DEMO_`
pub const DEMO_APPNAME: &str = "demo";

/// Schema with a restricted string, a number and a free string
pub const DEMO_SCHEMA: &str = r#"
appname = "demo"

[[setting]]
key = "color.fg"
type = "str"
default = "auto"
allowed = ["auto", "red", "blue"]
help = "Foreground color"

[[setting]]
key = "width"
type = "int"
default = 80
unit = "columns"

[[setting]]
key = "editor"
type = "str"
default = "vi"
"#;

/// A config file without errors for [`DEMO_SCHEMA`]
pub const VALID_CONFIG: &str = r#"# colors
set color.fg = red

set width=120 editor='nvim -u NONE'
"#;

/// A config file with two broken lines for [`DEMO_SCHEMA`]
pub const BROKEN_CONFIG: &str = "set color.fg = green\nset width = 100\nset widht = 3\n";

/// `color.fg` (auto, allowed auto/red/blue), `name` and `width`
pub fn color_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .define("color.fg", "auto".to_string())
        .with_allowed_values(["auto", "red", "blue"].map(String::from))
        .with_help("Foreground color")
        .register()
        .unwrap();
    registry.define("name", "x".to_string()).register().unwrap();
    registry
        .define("width", 80_i64)
        .with_unit("columns")
        .register()
        .unwrap();
    registry
}

/// [`color_registry`] plus the multi setting `greeting`
pub fn multi_registry() -> Registry {
    let mut registry = color_registry();
    registry
        .define("greeting", "hello".to_string())
        .multi()
        .register()
        .unwrap();
    registry
}
