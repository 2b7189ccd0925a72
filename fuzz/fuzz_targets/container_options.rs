#![no_main]

use ferrous_inject::DuplicatePolicy;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing is total: either a known policy or an error, never a panic
    if let Ok(policy) = text.parse::<DuplicatePolicy>() {
        let normalized = text.trim().to_ascii_lowercase().replace('-', "_");
        assert!(matches!(normalized.as_str(), "first_wins" | "last_wins" | "reject"), "{policy:?}");
    }
});
