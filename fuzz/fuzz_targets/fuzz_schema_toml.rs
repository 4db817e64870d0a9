#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz schema parsing - errors are fine, panics are not
        if let Ok((schema, _warnings)) = confline::Schema::parse(content, Path::new("schema.toml")) {
            let _ = schema.registry();
        }
    }
});
