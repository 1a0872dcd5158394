//! Log sinks for exception reports

use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// Destination for formatted exception lines
pub trait LogSink: Send + Sync {
    fn write(&self, zone_id: Option<&str>, line: &str) -> Result<()>;
}

/// Writes each line as a `tracing` error event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, zone_id: Option<&str>, line: &str) -> Result<()> {
        match zone_id {
            Some(zone) => error!(zone, "{}", line),
            None => error!("{}", line),
        }
        Ok(())
    }
}

/// Picks a sink for a zone, falling back to the default sink.
#[derive(Clone, Default)]
pub struct LogSinks {
    default: Option<Arc<dyn LogSink>>,
    zones: HashMap<String, Arc<dyn LogSink>>,
}

impl LogSinks {
    /// No sinks at all; logging through it does nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default sink only
    pub fn tracing() -> Self {
        Self::new().with_default(Arc::new(TracingSink))
    }

    pub fn with_default(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.default = Some(sink);
        self
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        self.zones.insert(zone_id.into(), sink);
        self
    }

    pub fn resolve(&self, zone_id: Option<&str>) -> Option<Arc<dyn LogSink>> {
        zone_id
            .and_then(|zone| self.zones.get(zone))
            .or(self.default.as_ref())
            .cloned()
    }
}
