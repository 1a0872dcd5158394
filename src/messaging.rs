//! Messaging Contracts
//!
//! Traits an agent implements to take part in a zone (publishing,
//! subscribing, consuming query results) and the message objects passed to
//! them. Transport and dispatch live outside this crate; a [`Zone`] is
//! whatever delivers messages to the zone integration server.

use crate::element::{ElementTree, SifElement};
use crate::error::Result;
use crate::exception::{run_batch, AdkException, SifError};
use crate::properties::ZoneProperties;
use crate::provisioning::SifContext;
use crate::query::{relative_path, Query};
use crate::version::SifVersion;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventAction {
    Add,
    Change,
    Delete,
}

impl EventAction {
    pub fn sif_name(self) -> &'static str {
        match self {
            EventAction::Add => "Add",
            EventAction::Change => "Change",
            EventAction::Delete => "Delete",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sif_name())
    }
}

/// A SIF_Event: one action applied to one or more objects of a type
#[derive(Debug, Clone)]
pub struct Event {
    action: EventAction,
    objects: Vec<ElementTree>,
    context: Option<Arc<SifContext>>,
}

impl Event {
    pub fn new(action: EventAction, objects: Vec<ElementTree>) -> Self {
        Self {
            action,
            objects,
            context: None,
        }
    }

    pub fn in_context(mut self, context: Arc<SifContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn action(&self) -> EventAction {
        self.action
    }

    pub fn objects(&self) -> &[ElementTree] {
        &self.objects
    }

    /// Name of the object type, taken from the first object.
    pub fn object_type(&self) -> Option<String> {
        self.objects.first().map(|o| o.name())
    }

    /// Context name; `SIF_Default` when none was set.
    pub fn context_name(&self) -> &str {
        self.context
            .as_ref()
            .map_or(SifContext::DEFAULT_NAME, |c| c.name())
    }
}

/// Header details of the message being handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub source_id: String,
    pub message_id: String,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    pub version: SifVersion,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_context() -> String {
    SifContext::DEFAULT_NAME.to_string()
}

impl MessageInfo {
    pub fn new(source_id: impl Into<String>, message_id: impl Into<String>, version: SifVersion) -> Self {
        Self {
            source_id: source_id.into(),
            message_id: message_id.into(),
            timestamp: None,
            version,
            zone_id: None,
            context: default_context(),
        }
    }
}

/// Identity of a zone, usable where a live zone cannot be held
pub trait ZoneContext {
    fn zone_id(&self) -> &str;
}

/// A connected zone
pub trait Zone: ZoneContext + Send + Sync {
    fn properties(&self) -> &ZoneProperties;

    /// Send a SIF_Event to the zone.
    fn report_event(&self, event: &Event) -> std::result::Result<(), AdkException>;
}

/// Report `event` to every zone. Zones that fail do not stop the others; the
/// failures come back as one aggregate with a child per zone.
pub fn broadcast_event(zones: &[Arc<dyn Zone>], event: &Event) -> std::result::Result<(), AdkException> {
    info!(
        action = %event.action(),
        zones = zones.len(),
        "broadcasting event"
    );
    run_batch(
        "event could not be reported to every zone",
        zones.iter(),
        |zone| {
            zone.report_event(event).map_err(|err| {
                if err.zone_id().is_some() {
                    err
                } else {
                    err.with_zone_id(zone.zone_id())
                }
            })
        },
    )
}

/// Sink for the objects a publisher returns in response to a query
pub trait DataObjectOutput {
    fn write(&mut self, object: &ElementTree) -> Result<()>;

    /// Report a SIF_Error instead of (or after) data.
    fn set_error(&mut self, error: SifError);
}

/// Collects response objects in memory, trimmed to the query's field
/// restrictions.
#[derive(Debug, Default)]
pub struct VecDataObjectOutput {
    restrictions: Vec<String>,
    objects: Vec<ElementTree>,
    error: Option<SifError>,
}

impl VecDataObjectOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_query(query: &Query) -> Self {
        Self {
            restrictions: query.field_restrictions().to_vec(),
            ..Self::default()
        }
    }

    pub fn objects(&self) -> &[ElementTree] {
        &self.objects
    }

    pub fn error(&self) -> Option<&SifError> {
        self.error.as_ref()
    }

    pub fn into_objects(self) -> Vec<ElementTree> {
        self.objects
    }
}

impl DataObjectOutput for VecDataObjectOutput {
    fn write(&mut self, object: &ElementTree) -> Result<()> {
        let copy = object.deep_clone();
        if !self.restrictions.is_empty() {
            let object_name = copy.name();
            let restrictions: Vec<String> = self
                .restrictions
                .iter()
                .map(|r| relative_path(&object_name, r))
                .collect();
            let keys: Vec<String> = copy.definition().key_fields().to_vec();
            prune(&copy, "", &restrictions, &keys);
        }
        self.objects.push(copy);
        Ok(())
    }

    fn set_error(&mut self, error: SifError) {
        debug!(%error, "query response error");
        self.error = Some(error);
    }
}

/// Drop children of `tree` that are not on a restricted path. Restrictions
/// are relative to the object. `keep` names top-level children kept
/// regardless.
fn prune(tree: &ElementTree, prefix: &str, restrictions: &[String], keep: &[String]) {
    for child in tree.children() {
        let name = child.name();
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        if keep.contains(&name) || restrictions.iter().any(|r| *r == path) {
            continue;
        }
        let is_ancestor = restrictions
            .iter()
            .any(|r| r.starts_with(&format!("{}.", path)));
        match child.as_tree() {
            Some(subtree) if is_ancestor => prune(subtree, &path, restrictions, &[]),
            _ => {
                tree.remove_child(&child);
            }
        }
    }
}

/// Responds to SIF_Request messages for the object types it provides
pub trait Publisher {
    fn on_request(
        &self,
        query: &Query,
        output: &mut dyn DataObjectOutput,
        zone: &dyn Zone,
        info: &MessageInfo,
    ) -> std::result::Result<(), AdkException>;
}

/// Receives SIF_Events for the object types it subscribes to
pub trait Subscriber {
    fn on_event(
        &self,
        event: &Event,
        zone: &dyn Zone,
        info: &MessageInfo,
    ) -> std::result::Result<(), AdkException>;
}

/// Receives SIF_Response data for queries the agent issued
pub trait QueryResults {
    /// Called once the request has been delivered to the zone.
    fn on_query_pending(&self, _info: &MessageInfo, _zone: &dyn Zone) {}

    fn on_query_results(
        &self,
        data: &[ElementTree],
        error: Option<&SifError>,
        zone: &dyn Zone,
        info: &MessageInfo,
    ) -> std::result::Result<(), AdkException>;
}
