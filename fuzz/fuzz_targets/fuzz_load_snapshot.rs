#![no_main]
use libfuzzer_sys::fuzz_target;
use netdrift::{DiffEngine, Snapshot};

/// Fuzz persisted snapshot parsing.
///
/// Any document that parses must compare equal to itself and survive a
/// serialize/parse cycle.
fuzz_target!(|data: &[u8]| {
    if let Ok(snapshot) = serde_json::from_slice::<Snapshot>(data) {
        assert!(DiffEngine::new().compare(&snapshot, &snapshot).is_empty());
        if let Ok(json) = serde_json::to_vec(&snapshot) {
            let reparsed: Snapshot = serde_json::from_slice(&json).expect("round trip");
            assert_eq!(reparsed, snapshot);
        }
    }
});
