use parking_lot::Mutex;
use sif_adk::exception::{codes, run_batch, ErrorCategory, LogSink, LogSinks, SifError};
use sif_adk::{AdkError, AdkException, Result};
use std::sync::Arc;

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl LogSink for Recorder {
    fn write(&self, _zone_id: Option<&str>, line: &str) -> Result<()> {
        self.0.lock().push(line.to_string());
        Ok(())
    }
}

fn registration_failure(zone: &str) -> AdkException {
    AdkException::from_sif_error(SifError::new(
        ErrorCategory::Registration,
        codes::registration::NOT_REGISTERED,
        "agent is not registered",
    ))
    .with_zone_id(zone)
}

#[test]
fn test_batch_collects_failures_and_searches_nested_codes() {
    let zones = ["North", "South", "East"];
    let result = run_batch("provisioning failed", zones, |zone| {
        if zone == "South" {
            Ok(())
        } else {
            Err(registration_failure(zone))
        }
    });

    let aggregate = result.unwrap_err();
    assert_eq!(aggregate.children().len(), 2);
    assert!(aggregate.has_error(ErrorCategory::Registration));
    assert!(aggregate.has_error_code(
        ErrorCategory::Registration,
        codes::registration::NOT_REGISTERED
    ));
    assert!(!aggregate.has_error(ErrorCategory::Transport));
}

#[test]
fn test_nested_aggregates_format_with_indentation() {
    let mut inner = AdkException::new("zone sync failed").with_zone_id("North");
    inner.add(AdkError::InvalidOperation("duplicate RefId".to_string()));
    let mut outer = AdkException::new("nightly sync failed");
    outer.add(inner);
    outer.add(registration_failure("East"));

    let report = outer.format(0, true);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "nightly sync failed");
    assert_eq!(lines[1], "  [North] zone sync failed");
    assert!(lines[2].starts_with("    invalid operation: duplicate RefId"));
    assert_eq!(
        lines[3],
        "  [East] agent is not registered [Category=5; Code=9]"
    );

    assert_eq!(outer.format(1, false), "  nightly sync failed");
    assert!(outer.has_error_code(ErrorCategory::Registration, 9));
}

#[test]
fn test_log_routes_each_zone_to_its_sink() {
    let north = Arc::new(Recorder::default());
    let fallback = Arc::new(Recorder::default());
    let sinks = LogSinks::new()
        .with_default(fallback.clone())
        .with_zone("North", north.clone());

    let mut outer = AdkException::new("batch failed");
    outer.add(registration_failure("North"));
    outer.add(registration_failure("East"));
    outer.log(&sinks, 0);

    assert_eq!(north.0.lock().len(), 1);
    assert!(north.0.lock()[0].contains("[North]"));
    let fallback_lines = fallback.0.lock();
    assert_eq!(fallback_lines.len(), 2);
    assert_eq!(fallback_lines[0], "batch failed");
    assert!(fallback_lines[1].starts_with("  [East]"));
}

#[test]
fn test_log_without_sinks_is_silent() {
    let err = registration_failure("North");
    err.log(&LogSinks::new(), 0);
}
