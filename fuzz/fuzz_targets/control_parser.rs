#![no_main]

use libfuzzer_sys::fuzz_target;
use perf_tracer::control::ControlCommand;
use perf_tracer::replay::ScriptLine;
use perf_tracer::{CallSiteKey, MAX_CALL_SITE_LEN};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // None of these may panic regardless of input
        let _ = ControlCommand::parse(input);
        let _ = ScriptLine::parse(input);

        let key = CallSiteKey::new(input);
        assert!(key.len() <= MAX_CALL_SITE_LEN);
        assert!(input.starts_with(key.as_str()));
    }
});
