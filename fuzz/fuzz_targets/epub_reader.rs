#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(result) = pivotstream::epub::extract_epub(data) {
        let total = pivotstream::count_tokens(&result.value.text);
        for marker in &result.value.chapters {
            assert!(marker.start_token_index <= total);
        }
    }
});
