//! Configuration
//!
//! Agent settings loaded with the `config` crate: an optional `adk.toml`
//! overlaid by `ADK__*` environment variables (`ADK__MESSAGING__MODE=push`).
//! The merged settings seed the root [`PropertyChain`] of an agent.

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

use crate::error::{AdkError, Result};
use crate::logging::LoggingConfig;
use crate::properties::{self, AgentProperties, PropertyChain};
use crate::provisioning::{MessagingMode, ProvisioningMode};
use crate::version::SifVersion;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Name of the configuration file looked up in a config directory
pub const CONFIG_FILE_NAME: &str = "adk.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagingConfig {
    #[serde(default)]
    pub mode: Option<MessagingMode>,
    #[serde(default)]
    pub pull_frequency_ms: Option<u64>,
    #[serde(default)]
    pub max_buffer_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    #[serde(default)]
    pub mode: Option<ProvisioningMode>,
    #[serde(default)]
    pub ignore_errors: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub protocol: Option<String>,
}

/// Merged agent configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdkConfig {
    #[serde(default)]
    pub messaging: MessagingConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
    /// SIF version for outgoing messages, e.g. `"2.0r1"`
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdkConfig {
    /// Write every configured setting into `chain` under its `adk.*` key.
    /// Settings left unset are not written.
    pub fn apply_to(&self, chain: &PropertyChain) -> Result<()> {
        if let Some(mode) = self.messaging.mode {
            chain.set(properties::MESSAGING_MODE, Some(&mode.to_string()));
        }
        if let Some(ms) = self.messaging.pull_frequency_ms {
            chain.set(properties::PULL_FREQUENCY, Some(&ms.to_string()));
        }
        if let Some(size) = self.messaging.max_buffer_size {
            chain.set_int(properties::MAX_BUFFER_SIZE, i64::from(size));
        }
        if let Some(mode) = self.provisioning.mode {
            chain.set(properties::PROVISIONING_MODE, Some(&mode.to_string()));
        }
        if let Some(ignore) = self.provisioning.ignore_errors {
            chain.set_bool(properties::IGNORE_PROVISIONING_ERRORS, ignore);
        }
        chain.set(properties::TRANSPORT_PROTOCOL, self.transport.protocol.as_deref());
        if let Some(ms) = self.default_timeout_ms {
            chain.set(properties::DEFAULT_TIMEOUT, Some(&ms.to_string()));
        }
        if let Some(text) = &self.version {
            let version = SifVersion::parse(text)
                .ok_or_else(|| AdkError::Config(format!("invalid SIF version '{}'", text)))?;
            chain.set(properties::SIF_VERSION, Some(&version.to_string()));
        }
        debug!(keys = chain.local_keys().len(), "applied configuration to property chain");
        Ok(())
    }

    /// Root agent properties seeded from this configuration.
    pub fn agent_properties(&self) -> Result<AgentProperties> {
        let chain = Arc::new(PropertyChain::new());
        self.apply_to(&chain)?;
        Ok(AgentProperties::from_chain(chain))
    }
}
