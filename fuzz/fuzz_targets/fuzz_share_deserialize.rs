#![no_main]

use libfuzzer_sys::fuzz_target;

use sharechain_tracker::{ShareTracker, TrackerConfig};
use sharechain_types::ShareSummary;

// Feed whatever decodes as a list of shares through the tracker. Neither
// decoding nor add/verify/maintain may panic on malformed input.
fuzz_target!(|data: &[u8]| {
    let Ok(shares) = serde_json::from_slice::<Vec<ShareSummary>>(data) else {
        return;
    };

    let mut tracker = ShareTracker::with_system_clock(TrackerConfig::default());
    for share in &shares {
        let _ = tracker.add(share.clone());
    }
    for share in &shares {
        let _ = tracker.verify(share);
    }
    let _ = tracker.maintain();
});
