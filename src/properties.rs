//! Property Chain
//!
//! Hierarchical string properties. A chain looks a key up locally and then
//! asks its parent; writes never reach the parent. The agent owns the root
//! chain, each zone gets a child of it, so zone settings override agent
//! settings without copying them.

use crate::provisioning::{MessagingMode, ProvisioningMode};
use crate::version::SifVersion;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// String map with parent-delegated lookup
///
/// The parent is fixed at construction, so a chain can never become its own
/// ancestor.
#[derive(Debug, Default)]
pub struct PropertyChain {
    values: RwLock<HashMap<String, String>>,
    parent: Option<Arc<PropertyChain>>,
}

impl PropertyChain {
    /// A root chain
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Arc<PropertyChain>) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&Arc<PropertyChain>> {
        self.parent.as_ref()
    }

    /// Local value, else the nearest ancestor's.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.values.read().get(key) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(key))
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Store a local value. `None` is ignored so a parent value is never
    /// shadowed by an absent one.
    pub fn set(&self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.values
                .write()
                .insert(key.to_string(), value.to_string());
        }
    }

    pub fn set_int(&self, key: &str, value: i64) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    pub fn set_bool(&self, key: &str, value: bool) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    /// Parsed value of `key`, or `default` when missing or malformed.
    pub fn get_parsed<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(text) => match text.trim().parse() {
                Ok(value) => value,
                Err(_) => {
                    warn!(key, value = %text, "ignoring malformed property value");
                    default
                }
            },
            None => default,
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_parsed(key, default)
    }

    /// Accepts `true`/`false`, `yes`/`no` and `1`/`0` in any case.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(text) = self.get(key) else {
            return default;
        };
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => {
                warn!(key, value = %text, "ignoring malformed boolean property");
                default
            }
        }
    }

    /// Whether `key` is set on this chain itself; ancestors are not checked.
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }

    pub fn local_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

pub const MESSAGING_MODE: &str = "adk.messaging.mode";
pub const PULL_FREQUENCY: &str = "adk.messaging.pullFrequency";
pub const MAX_BUFFER_SIZE: &str = "adk.messaging.maxBufferSize";
pub const PROVISIONING_MODE: &str = "adk.provisioning.mode";
pub const IGNORE_PROVISIONING_ERRORS: &str = "adk.provisioning.ignoreErrors";
pub const TRANSPORT_PROTOCOL: &str = "adk.transport.protocol";
pub const DEFAULT_TIMEOUT: &str = "adk.defaultTimeout";
pub const SIF_VERSION: &str = "adk.version";

const DEFAULT_PULL_FREQUENCY_MS: i64 = 30_000;
const DEFAULT_MAX_BUFFER_SIZE: i64 = 393_216;
const DEFAULT_TIMEOUT_MS: i64 = 30_000;

fn millis(chain: &PropertyChain, key: &str, default: i64) -> Duration {
    let ms = chain.get_int(key, default);
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

/// Typed access to the standard `adk.*` keys
pub trait AdkProperties {
    fn chain(&self) -> &Arc<PropertyChain>;

    fn messaging_mode(&self) -> MessagingMode {
        self.chain().get_parsed(MESSAGING_MODE, MessagingMode::default())
    }

    fn set_messaging_mode(&self, mode: MessagingMode) {
        self.chain().set(MESSAGING_MODE, Some(&mode.to_string()));
    }

    /// Interval between pull requests in pull mode
    fn pull_frequency(&self) -> Duration {
        millis(self.chain(), PULL_FREQUENCY, DEFAULT_PULL_FREQUENCY_MS)
    }

    fn set_pull_frequency(&self, frequency: Duration) {
        self.chain()
            .set_int(PULL_FREQUENCY, frequency.as_millis().min(i64::MAX as u128) as i64);
    }

    /// Largest message the agent accepts, in bytes
    fn max_buffer_size(&self) -> u32 {
        let size = self.chain().get_int(MAX_BUFFER_SIZE, DEFAULT_MAX_BUFFER_SIZE);
        u32::try_from(size).unwrap_or(DEFAULT_MAX_BUFFER_SIZE as u32)
    }

    fn set_max_buffer_size(&self, size: u32) {
        self.chain().set_int(MAX_BUFFER_SIZE, i64::from(size));
    }

    fn provisioning_mode(&self) -> ProvisioningMode {
        self.chain()
            .get_parsed(PROVISIONING_MODE, ProvisioningMode::default())
    }

    fn set_provisioning_mode(&self, mode: ProvisioningMode) {
        self.chain().set(PROVISIONING_MODE, Some(&mode.to_string()));
    }

    fn ignore_provisioning_errors(&self) -> bool {
        self.chain().get_bool(IGNORE_PROVISIONING_ERRORS, false)
    }

    fn set_ignore_provisioning_errors(&self, ignore: bool) {
        self.chain().set_bool(IGNORE_PROVISIONING_ERRORS, ignore);
    }

    fn transport_protocol(&self) -> String {
        self.chain().get_or(TRANSPORT_PROTOCOL, "http")
    }

    fn set_transport_protocol(&self, protocol: &str) {
        self.chain().set(TRANSPORT_PROTOCOL, Some(protocol));
    }

    fn default_timeout(&self) -> Duration {
        millis(self.chain(), DEFAULT_TIMEOUT, DEFAULT_TIMEOUT_MS)
    }

    fn set_default_timeout(&self, timeout: Duration) {
        self.chain()
            .set_int(DEFAULT_TIMEOUT, timeout.as_millis().min(i64::MAX as u128) as i64);
    }

    /// Version used for outgoing messages
    fn sif_version(&self) -> SifVersion {
        self.chain().get_parsed(SIF_VERSION, SifVersion::LATEST)
    }

    fn set_sif_version(&self, version: SifVersion) {
        self.chain().set(SIF_VERSION, Some(&version.to_string()));
    }
}

/// Agent-wide properties; the root of every zone's chain
#[derive(Debug, Clone)]
pub struct AgentProperties {
    chain: Arc<PropertyChain>,
}

impl AgentProperties {
    pub fn new() -> Self {
        Self::from_chain(Arc::new(PropertyChain::new()))
    }

    pub fn from_chain(chain: Arc<PropertyChain>) -> Self {
        Self { chain }
    }

    /// Properties for a zone, inheriting every agent setting.
    pub fn zone_properties(&self) -> ZoneProperties {
        ZoneProperties {
            chain: Arc::new(PropertyChain::with_parent(self.chain.clone())),
        }
    }
}

impl Default for AgentProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl AdkProperties for AgentProperties {
    fn chain(&self) -> &Arc<PropertyChain> {
        &self.chain
    }
}

/// Per-zone overrides of the agent properties
#[derive(Debug, Clone)]
pub struct ZoneProperties {
    chain: Arc<PropertyChain>,
}

impl AdkProperties for ZoneProperties {
    fn chain(&self) -> &Arc<PropertyChain> {
        &self.chain
    }
}
