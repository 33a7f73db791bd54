#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Malformed markup degrades to partial text, never a panic
        let _ = pivotstream::html::html_to_text(s);
    }
});
