use sif_adk::messaging::ZoneContext;
use sif_adk::provisioning::{MessagingMode, ProvisioningMode};
use sif_adk::{AdkProperties, AgentProperties, SifVersion};
use std::time::Duration;

#[test]
fn test_zone_inherits_agent_settings_until_overridden() {
    let agent = AgentProperties::new();
    let zone = agent.zone_properties();

    agent.set_messaging_mode(MessagingMode::Push);
    agent.set_max_buffer_size(1_048_576);
    assert_eq!(zone.messaging_mode(), MessagingMode::Push);
    assert_eq!(zone.max_buffer_size(), 1_048_576);

    zone.set_messaging_mode(MessagingMode::Pull);
    assert_eq!(zone.messaging_mode(), MessagingMode::Pull);
    assert_eq!(agent.messaging_mode(), MessagingMode::Push);

    zone.chain().remove("adk.messaging.mode");
    assert_eq!(zone.messaging_mode(), MessagingMode::Push);
}

#[test]
fn test_defaults_apply_when_nothing_is_set() {
    let zone = AgentProperties::new().zone_properties();
    assert_eq!(zone.messaging_mode(), MessagingMode::Pull);
    assert_eq!(zone.provisioning_mode(), ProvisioningMode::Adk);
    assert_eq!(zone.pull_frequency(), Duration::from_secs(30));
    assert_eq!(zone.default_timeout(), Duration::from_secs(30));
    assert_eq!(zone.max_buffer_size(), 393_216);
    assert_eq!(zone.transport_protocol(), "http");
    assert_eq!(zone.sif_version(), SifVersion::LATEST);
    assert!(!zone.ignore_provisioning_errors());
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let agent = AgentProperties::new();
    agent.chain().set("adk.messaging.pullFrequency", Some("soon"));
    agent.chain().set("adk.provisioning.ignoreErrors", Some("maybe"));
    agent.chain().set("adk.version", Some("2.0r1"));

    let zone = agent.zone_properties();
    assert_eq!(zone.pull_frequency(), Duration::from_secs(30));
    assert!(!zone.ignore_provisioning_errors());
    assert_eq!(zone.sif_version(), SifVersion::SIF20R1);
}

#[test]
fn test_absent_value_never_shadows_parent() {
    let agent = AgentProperties::new();
    agent.set_transport_protocol("https");
    let zone = agent.zone_properties();
    zone.chain().set("adk.transport.protocol", None);
    assert!(!zone.chain().contains("adk.transport.protocol"));
    assert_eq!(zone.transport_protocol(), "https");
}

struct NamedZone(&'static str);

impl ZoneContext for NamedZone {
    fn zone_id(&self) -> &str {
        self.0
    }
}

#[test]
fn test_zone_context_tags_exceptions() {
    let err = sif_adk::AdkException::new("not registered").in_zone(&NamedZone("District9"));
    assert_eq!(err.zone_id(), Some("District9"));
    assert_eq!(err.to_string(), "[District9] not registered");
}
