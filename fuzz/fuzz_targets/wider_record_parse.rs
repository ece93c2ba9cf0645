//! Fuzz target for WIDER FACE single-line box parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 lines to the box line parser and
//! re-parses every accepted record from its rendered form.

#![no_main]

use libfuzzer_sys::fuzz_target;
use widerface::wider::fuzz_parse_record_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_record_line(line);
});
