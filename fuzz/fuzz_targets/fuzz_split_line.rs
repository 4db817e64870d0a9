#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        // Splitting should never panic
        let _ = confline::split_line(line);
        let _ = confline::parser::split_line_lenient(line);
    }
});
