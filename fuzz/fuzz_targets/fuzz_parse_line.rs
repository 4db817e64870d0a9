#![no_main]

use confline::config::Registry;
use confline::infrastructure::{FixedDirs, MapEnv, MemoryFs};
use confline::{ConfigFile, ConfigFileOptions, Ports};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let mut registry = Registry::new();
        registry.define("name", "x".to_string()).register().unwrap();
        registry.define("width", 80_i64).register().unwrap();
        registry.define("ratio", 0.5_f64).register().unwrap();
        registry.define("flag", false).register().unwrap();
        registry.define("items", vec![1_i64]).multi().register().unwrap();

        let ports = Ports::new(MemoryFs::new(), MapEnv::new(), FixedDirs::new("/config"));
        let mut config_file = ConfigFile::with_ports(registry, ConfigFileOptions::new("app"), ports);

        // Every line is either applied or reported, never a panic
        for line in content.lines() {
            let _ = config_file.parse_line(line);
        }
    }
});
