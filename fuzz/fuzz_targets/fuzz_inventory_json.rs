#![no_main]
use chrono::Utc;
use libfuzzer_sys::fuzz_target;
use netdrift::model::{RawInventory, Scope, Snapshot};

/// Fuzz topology derivation over arbitrary inventory documents.
///
/// Building must either succeed or reject duplicate ids; it must never
/// panic on dangling references between collections.
fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = serde_json::from_slice::<RawInventory>(data) {
        let _ = Snapshot::build(raw, Scope::new("us-east-1"), Utc::now());
    }
});
