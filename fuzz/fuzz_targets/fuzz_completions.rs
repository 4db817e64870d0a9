#![no_main]

use confline::config::Registry;
use confline::infrastructure::{FixedDirs, MapEnv, MemoryFs};
use confline::{ConfigFile, ConfigFileOptions, Ports};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&cursor, rest)) = data.split_first() else {
        return;
    };
    if let Ok(line) = std::str::from_utf8(rest) {
        let mut registry = Registry::new();
        registry.define("color.fg", "auto".to_string()).register().unwrap();
        registry.define("width", 80_i64).multi().register().unwrap();

        let ports = Ports::new(MemoryFs::new(), MapEnv::new(), FixedDirs::new("/config"));
        let config_file = ConfigFile::with_ports(registry, ConfigFileOptions::new("app"), ports);

        let _ = config_file.get_completions(line, usize::from(cursor));
    }
});
