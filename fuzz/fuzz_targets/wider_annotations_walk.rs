//! Fuzz target for whole annotation files.
//!
//! Walks arbitrary text as a ground-truth file and checks that every image
//! found by the walk resolves identically through the scan and the suffix
//! lookup table.

#![no_main]

use libfuzzer_sys::fuzz_target;
use widerface::wider::fuzz_walk_annotations;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_walk_annotations(text);
});
