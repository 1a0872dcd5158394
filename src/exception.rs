//! Exception Aggregate
//!
//! [`AdkException`] is the failure type for operations that span several
//! zones or objects. It carries the zone it came from, optional SIF_Error
//! details and any number of child failures, so a batch can keep going
//! after one target fails and report everything at the end.

mod batch;
mod sif_error;
mod sink;

pub use batch::run_batch;
pub use sif_error::{codes, ErrorCategory, SifError};
pub use sink::{LogSink, LogSinks, TracingSink};

use crate::error::AdkError;
use crate::messaging::ZoneContext;
use std::error::Error as StdError;
use std::fmt;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A nested failure
#[derive(Debug)]
pub enum Child {
    Adk(AdkException),
    Foreign(BoxError),
}

impl Child {
    pub fn foreign(err: impl StdError + Send + Sync + 'static) -> Self {
        Child::Foreign(Box::new(err))
    }

    pub fn as_adk(&self) -> Option<&AdkException> {
        match self {
            Child::Adk(e) => Some(e),
            Child::Foreign(_) => None,
        }
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Adk(e) => fmt::Display::fmt(e, f),
            Child::Foreign(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl From<AdkException> for Child {
    fn from(err: AdkException) -> Self {
        Child::Adk(err)
    }
}

impl From<AdkError> for Child {
    fn from(err: AdkError) -> Self {
        Child::foreign(err)
    }
}

#[derive(Debug)]
pub struct AdkException {
    message: String,
    zone_id: Option<String>,
    cause: Option<BoxError>,
    children: Vec<Child>,
    retry: bool,
    sif_error: Option<SifError>,
}

impl AdkException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            zone_id: None,
            cause: None,
            children: Vec::new(),
            retry: false,
            sif_error: None,
        }
    }

    /// Exception describing a SIF_Error; the description becomes the message.
    pub fn from_sif_error(error: SifError) -> Self {
        let mut exception = Self::new(error.description.clone());
        exception.sif_error = Some(error);
        exception
    }

    /// Record the zone the failure occurred in. Only its id is kept.
    pub fn in_zone(mut self, zone: &dyn ZoneContext) -> Self {
        self.zone_id = Some(zone.zone_id().to_string());
        self
    }

    pub fn with_zone_id(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_sif_error(mut self, error: SifError) -> Self {
        self.sif_error = Some(error);
        self
    }

    /// Hint that the caller may retry the operation
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    pub fn sif_error(&self) -> Option<&SifError> {
        self.sif_error.as_ref()
    }

    pub fn retry(&self) -> bool {
        self.retry
    }

    /// Append a child failure. Children keep insertion order; duplicates are
    /// kept.
    pub fn add(&mut self, child: impl Into<Child>) {
        self.children.push(child.into());
    }

    pub fn add_error(&mut self, err: impl StdError + Send + Sync + 'static) {
        self.children.push(Child::foreign(err));
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this exception or any descendant carries a SIF_Error in
    /// `category`.
    pub fn has_error(&self, category: ErrorCategory) -> bool {
        self.find_error(category, None)
    }

    pub fn has_error_code(&self, category: ErrorCategory, code: u32) -> bool {
        self.find_error(category, Some(code))
    }

    fn find_error(&self, category: ErrorCategory, code: Option<u32>) -> bool {
        if let Some(error) = &self.sif_error {
            if error.matches(category, code) {
                return true;
            }
        }
        self.children
            .iter()
            .filter_map(Child::as_adk)
            .any(|child| child.find_error(category, code))
    }

    fn headline(&self) -> String {
        let mut line = String::new();
        if let Some(zone) = &self.zone_id {
            line.push_str(&format!("[{}] ", zone));
        }
        line.push_str(&self.message);
        if let Some(error) = &self.sif_error {
            if error.description != self.message {
                line.push_str(&format!(": {}", error));
            } else {
                line.push_str(&format!(
                    " [Category={}; Code={}]",
                    error.category.code(),
                    error.code
                ));
            }
        }
        if let Some(cause) = &self.cause {
            line.push_str(&format!(" (caused by: {})", cause));
        }
        line
    }

    /// Multi-line report, two spaces per indent level.
    pub fn format(&self, indent: usize, include_children: bool) -> String {
        let mut lines = Vec::new();
        self.collect_lines(indent, include_children, &mut lines);
        lines.join("\n")
    }

    fn collect_lines(&self, indent: usize, include_children: bool, lines: &mut Vec<String>) {
        lines.push(format!("{}{}", pad(indent), self.headline()));
        if !include_children {
            return;
        }
        for child in &self.children {
            match child {
                Child::Adk(e) => e.collect_lines(indent + 1, true, lines),
                Child::Foreign(e) => lines.push(format!("{}{}", pad(indent + 1), e)),
            }
        }
    }

    /// Write this exception and its children to the sink for its zone.
    ///
    /// Nothing is written when no sink resolves. Sink failures are dropped.
    pub fn log(&self, sinks: &LogSinks, indent: usize) {
        let zone = self.zone_id.as_deref();
        let Some(sink) = sinks.resolve(zone) else {
            return;
        };
        let _ = sink.write(zone, &format!("{}{}", pad(indent), self.headline()));
        for child in &self.children {
            match child {
                Child::Adk(e) => e.log(sinks, indent + 1),
                Child::Foreign(e) => {
                    let _ = sink.write(zone, &format!("{}{}", pad(indent + 1), e));
                }
            }
        }
    }
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

impl fmt::Display for AdkException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())
    }
}

impl StdError for AdkException {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<AdkError> for AdkException {
    fn from(err: AdkError) -> Self {
        AdkException::new(err.to_string()).with_cause(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl LogSink for Recorder {
        fn write(&self, _zone_id: Option<&str>, line: &str) -> Result<()> {
            self.0.lock().push(line.to_string());
            Ok(())
        }
    }

    struct Failing;

    impl LogSink for Failing {
        fn write(&self, _zone_id: Option<&str>, _line: &str) -> Result<()> {
            Err(AdkError::Unsupported("closed".to_string()))
        }
    }

    fn registration_and_transport() -> AdkException {
        let mut aggregate = AdkException::new("provisioning failed");
        aggregate.add(AdkException::from_sif_error(SifError::new(
            ErrorCategory::Registration,
            2,
            "The SIF_SourceId is invalid",
        )));
        aggregate.add(
            AdkException::from_sif_error(SifError::new(
                ErrorCategory::Transport,
                1,
                "Generic transport error",
            ))
            .with_zone_id("Z2"),
        );
        aggregate
    }

    #[test]
    fn test_has_error_searches_children() {
        let aggregate = registration_and_transport();
        assert!(aggregate.has_error_code(ErrorCategory::Registration, 2));
        assert!(!aggregate.has_error_code(ErrorCategory::Transport, 2));
        assert!(aggregate.has_error(ErrorCategory::Transport));
        assert!(!aggregate.has_error(ErrorCategory::System));
        assert_eq!(aggregate.children().len(), 2);
        assert!(aggregate.has_children());
    }

    #[test]
    fn test_empty_aggregate() {
        let aggregate = AdkException::new("nothing");
        assert!(aggregate.children().is_empty());
        assert!(!aggregate.has_children());
        assert!(!aggregate.has_error(ErrorCategory::Unknown));
    }

    #[test]
    fn test_nested_search_is_depth_first() {
        let mut inner = AdkException::new("inner");
        inner.add(AdkException::from_sif_error(SifError::new(
            ErrorCategory::System,
            3,
            "unavailable",
        )));
        let mut outer = AdkException::new("outer");
        outer.add_error(AdkError::Unsupported("x".to_string()));
        outer.add(inner);
        assert!(outer.has_error_code(ErrorCategory::System, 3));
    }

    #[test]
    fn test_format_indents_children() {
        let mut aggregate = registration_and_transport();
        aggregate.add_error(AdkError::Config("bad value".to_string()));
        let text = aggregate.format(0, true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "provisioning failed");
        assert!(lines[1].starts_with("  The SIF_SourceId is invalid [Category=5; Code=2]"));
        assert!(lines[2].starts_with("  [Z2] Generic transport error"));
        assert_eq!(lines[3], "  configuration error: bad value");

        assert_eq!(aggregate.format(1, false), "  provisioning failed");
    }

    #[test]
    fn test_log_resolves_zone_sink_and_swallows_failures() {
        let default = Arc::new(Recorder::default());
        let zone = Arc::new(Recorder::default());
        let sinks = LogSinks::new()
            .with_default(default.clone())
            .with_zone("Z2", zone.clone());
        registration_and_transport().log(&sinks, 0);

        assert_eq!(default.0.lock().len(), 2);
        assert_eq!(zone.0.lock().len(), 1);
        assert!(zone.0.lock()[0].starts_with("  [Z2]"));

        registration_and_transport().log(&LogSinks::new(), 0);
        registration_and_transport().log(&LogSinks::new().with_default(Arc::new(Failing)), 0);
    }

    #[test]
    fn test_source_is_cause() {
        let err: AdkException = AdkError::InvalidOperation("nope".to_string()).into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("nope"));
        assert!(!err.retry());
        assert!(err.with_retry(true).retry());
    }
}
