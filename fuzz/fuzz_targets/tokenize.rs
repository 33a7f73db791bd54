#![no_main]

use libfuzzer_sys::fuzz_target;
use pivotstream::{count_tokens, normalize, tokenize};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let text = normalize(s);
        assert_eq!(normalize(&text), text, "normalize is not idempotent");

        let tokens = tokenize(&text);
        assert_eq!(tokens.len(), count_tokens(&text));
        for token in &tokens {
            assert!(!token.core.is_empty());
            assert!(token.fixation_index < token.core_len());
            assert!(token.pause_multiplier >= 1.0);
        }
    }
});
