//! End-to-end scenarios through the public API
//!
//! begin/end → registry → report, control protocol, and the process-wide
//! tracer instance.

use perf_tracer::control::{self, ControlCommand};
use perf_tracer::json_output::JsonOutput;
use perf_tracer::{
    global, CallSiteKey, EndOutcome, ManualClock, PerfTracer, ReportRow, Timestamp, TracerConfig,
    MAX_CALL_SITE_LEN,
};
use serial_test::serial;

fn ts(nanos: u64) -> Timestamp {
    Timestamp::from_nanos(nanos)
}

#[test]
fn test_single_round_trip_report() {
    let tracer = PerfTracer::default();
    let t0 = 5_000;
    let token = tracer.begin_at(CallSiteKey::new("foo"), ts(t0));
    tracer.end_at(token, ts(t0 + 150));

    assert_eq!(
        tracer.snapshot_report(),
        vec![ReportRow {
            identifier: "foo".to_string(),
            count: 1,
            total_ns: 150,
            average_ns: 150,
            min_ns: 150,
            max_ns: 150,
        }]
    );
}

#[test]
fn test_budget_of_two_keeps_first_two_keys() {
    let tracer = PerfTracer::new(&TracerConfig {
        max_events: 2,
        ..TracerConfig::default()
    });

    for (name, d) in [("a", 10), ("b", 20), ("c", 30)] {
        let token = tracer.begin_at(CallSiteKey::new(name), ts(0));
        tracer.end_at(token, ts(d));
    }

    let rows = tracer.snapshot_report();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].identifier, "a");
    assert_eq!(rows[0].total_ns, 10);
    assert_eq!(rows[1].identifier, "b");
    assert_eq!(rows[1].total_ns, 20);
    assert!(rows.iter().all(|r| r.identifier != "c"));
    assert_eq!(tracer.events_remaining(), 0);
}

#[test]
fn test_truncated_identifiers_share_an_entry() {
    let tracer = PerfTracer::default();
    let prefix = "ext4_file_write_iter_".repeat(4);
    assert!(prefix.len() > MAX_CALL_SITE_LEN);

    tracer.record(CallSiteKey::new(&format!("{}alpha", prefix)), 10);
    tracer.record(CallSiteKey::new(&format!("{}beta", prefix)), 30);

    let rows = tracer.snapshot_report();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].identifier.len(), MAX_CALL_SITE_LEN);
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].average_ns, 20);
}

#[test]
fn test_control_protocol_session() {
    let clock = ManualClock::new(ts(0));
    let tracer = PerfTracer::with_clock(&TracerConfig::default(), clock.clone());

    let token = tracer.begin("do_sys_open");
    clock.advance(100);
    assert_eq!(tracer.end(token), EndOutcome::Recorded);

    assert_eq!(control::execute(&tracer, "0\n"), Ok(ControlCommand::Disable));
    let token = tracer.begin("do_sys_open");
    clock.advance(100);
    assert_eq!(tracer.end(token), EndOutcome::Disabled);

    assert!(control::execute(&tracer, "pause").is_err());
    assert!(!tracer.is_enabled());

    assert_eq!(control::execute(&tracer, "1\n"), Ok(ControlCommand::Enable));
    let token = tracer.begin("do_sys_open");
    clock.advance(300);
    tracer.end(token);

    let rows = tracer.snapshot_report();
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].min_ns, 100);
    assert_eq!(rows[0].max_ns, 300);

    assert_eq!(control::execute(&tracer, "clear\n"), Ok(ControlCommand::Clear));
    assert!(tracer.snapshot_report().is_empty());
    assert_eq!(tracer.events_remaining(), 1000);
}

#[test]
fn test_unconsumed_token_contributes_nothing() {
    let tracer = PerfTracer::default();
    let token = tracer.begin("abandoned");
    drop(token);
    assert!(tracer.snapshot_report().is_empty());
    assert_eq!(tracer.events_remaining(), 1000);
}

#[test]
fn test_report_renderers_agree() {
    let tracer = PerfTracer::default();
    tracer.record(CallSiteKey::new("vfs_read"), 400);
    tracer.record(CallSiteKey::new("vfs_write"), 900);

    let report = tracer.report();
    let text = report.to_text();
    assert!(text.contains("vfs_read"));
    assert!(text.contains("vfs_write"));

    let json = JsonOutput::from_report(&report).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["events_recorded"], 2);
    assert_eq!(value["call_sites"][1]["identifier"], "vfs_write");
}

#[test]
#[serial]
fn test_global_tracer_is_shared() {
    let tracer = global();
    tracer.clear();
    tracer.set_enabled(true);

    tracer.measure("global_site", || ());
    assert!(std::ptr::eq(tracer, global()));
    assert_eq!(global().snapshot_report()[0].identifier, "global_site");

    tracer.clear();
}

#[test]
#[serial]
fn test_global_tracer_across_threads() {
    global().clear();
    global().set_enabled(true);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                for _ in 0..10 {
                    global().record(CallSiteKey::new("threaded"), 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let rows = global().snapshot_report();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 40);
    global().clear();
}
