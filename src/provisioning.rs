//! Provisioning Options
//!
//! SIF contexts and the option objects an agent hands to a zone when it
//! registers as a publisher, subscriber or query responder. Options are
//! value objects: built once through the `with_*` methods, then only read.

use crate::error::{AdkError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// A named SIF context. Every zone supports `SIF_Default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SifContext {
    name: String,
}

impl SifContext {
    pub const DEFAULT_NAME: &'static str = "SIF_Default";

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name == Self::DEFAULT_NAME
    }
}

impl fmt::Display for SifContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Contexts known to an agent, created on first use.
pub struct ContextRegistry {
    contexts: RwLock<HashMap<String, Arc<SifContext>>>,
    default: Arc<SifContext>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        let default = Arc::new(SifContext {
            name: SifContext::DEFAULT_NAME.to_string(),
        });
        let mut contexts = HashMap::new();
        contexts.insert(default.name.clone(), default.clone());
        Self {
            contexts: RwLock::new(contexts),
            default,
        }
    }

    pub fn default_context(&self) -> Arc<SifContext> {
        self.default.clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<SifContext>> {
        self.contexts.read().get(name).cloned()
    }

    /// Return the context named `name`, registering it when missing. Names
    /// must be non-blank.
    pub fn get_or_create(&self, name: &str) -> Result<Arc<SifContext>> {
        if name.trim().is_empty() {
            return Err(AdkError::InvalidOperation(
                "context name must not be blank".to_string(),
            ));
        }
        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }
        let mut contexts = self.contexts.write();
        let context = contexts
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(context = name, "registered SIF context");
                Arc::new(SifContext {
                    name: name.to_string(),
                })
            })
            .clone();
        Ok(context)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.contexts.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Who performs SIF_Register / SIF_Subscribe / SIF_Provide for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningMode {
    /// The framework sends provisioning messages on the agent's behalf
    #[default]
    Adk,
    /// The zone integration server is provisioned out of band
    Zis,
    /// The agent sends its own provisioning messages
    Agent,
}

impl fmt::Display for ProvisioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProvisioningMode::Adk => "adk",
            ProvisioningMode::Zis => "zis",
            ProvisioningMode::Agent => "agent",
        };
        f.write_str(text)
    }
}

impl FromStr for ProvisioningMode {
    type Err = AdkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adk" => Ok(ProvisioningMode::Adk),
            "zis" => Ok(ProvisioningMode::Zis),
            "agent" => Ok(ProvisioningMode::Agent),
            other => Err(AdkError::Config(format!(
                "invalid provisioning mode '{}' (must be 'adk', 'zis' or 'agent')",
                other
            ))),
        }
    }
}

/// How messages are delivered from the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingMode {
    Push,
    #[default]
    Pull,
}

impl fmt::Display for MessagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessagingMode::Push => "push",
            MessagingMode::Pull => "pull",
        })
    }
}

impl FromStr for MessagingMode {
    type Err = AdkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" => Ok(MessagingMode::Push),
            "pull" => Ok(MessagingMode::Pull),
            other => Err(AdkError::Config(format!(
                "invalid messaging mode '{}' (must be 'push' or 'pull')",
                other
            ))),
        }
    }
}

/// Contexts an operation is provisioned in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningOptions {
    contexts: Vec<Arc<SifContext>>,
}

impl ProvisioningOptions {
    /// Options for the default context of `registry`.
    pub fn new(registry: &ContextRegistry) -> Self {
        Self {
            contexts: vec![registry.default_context()],
        }
    }

    /// Replace the context list. An empty list keeps the current contexts.
    pub fn with_contexts<I>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = Arc<SifContext>>,
    {
        let mut unique: Vec<Arc<SifContext>> = Vec::new();
        for context in contexts {
            if !unique.iter().any(|c| c.name() == context.name()) {
                unique.push(context);
            }
        }
        if !unique.is_empty() {
            self.contexts = unique;
        }
        self
    }

    pub fn contexts(&self) -> &[Arc<SifContext>] {
        &self.contexts
    }

    pub fn supports_context(&self, name: &str) -> bool {
        self.contexts.iter().any(|c| c.name() == name)
    }
}

/// Options for publishing (SIF_Provide) an object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishingOptions {
    base: ProvisioningOptions,
    send_events: bool,
}

impl PublishingOptions {
    pub fn new(registry: &ContextRegistry) -> Self {
        Self {
            base: ProvisioningOptions::new(registry),
            send_events: true,
        }
    }

    pub fn with_contexts<I>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = Arc<SifContext>>,
    {
        self.base = self.base.with_contexts(contexts);
        self
    }

    /// Whether the agent reports SIF_Events for the object type
    pub fn with_send_events(mut self, send_events: bool) -> Self {
        self.send_events = send_events;
        self
    }

    pub fn send_events(&self) -> bool {
        self.send_events
    }

    pub fn provisioning(&self) -> &ProvisioningOptions {
        &self.base
    }
}

/// Options for publishing SIF_ReportObject data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPublishingOptions {
    base: ProvisioningOptions,
}

impl ReportPublishingOptions {
    pub fn new(registry: &ContextRegistry) -> Self {
        Self {
            base: ProvisioningOptions::new(registry),
        }
    }

    pub fn with_contexts<I>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = Arc<SifContext>>,
    {
        self.base = self.base.with_contexts(contexts);
        self
    }

    pub fn provisioning(&self) -> &ProvisioningOptions {
        &self.base
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionOptions {
    base: ProvisioningOptions,
}

impl SubscriptionOptions {
    pub fn new(registry: &ContextRegistry) -> Self {
        Self {
            base: ProvisioningOptions::new(registry),
        }
    }

    pub fn with_contexts<I>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = Arc<SifContext>>,
    {
        self.base = self.base.with_contexts(contexts);
        self
    }

    pub fn provisioning(&self) -> &ProvisioningOptions {
        &self.base
    }
}

/// Options for receiving SIF_Response packets to the agent's own queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResultsOptions {
    base: ProvisioningOptions,
    supports_extended_query: bool,
}

impl QueryResultsOptions {
    pub fn new(registry: &ContextRegistry) -> Self {
        Self {
            base: ProvisioningOptions::new(registry),
            supports_extended_query: false,
        }
    }

    pub fn with_contexts<I>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = Arc<SifContext>>,
    {
        self.base = self.base.with_contexts(contexts);
        self
    }

    pub fn with_extended_query(mut self, supported: bool) -> Self {
        self.supports_extended_query = supported;
        self
    }

    pub fn supports_extended_query(&self) -> bool {
        self.supports_extended_query
    }

    pub fn provisioning(&self) -> &ProvisioningOptions {
        &self.base
    }
}
