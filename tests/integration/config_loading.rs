use sif_adk::config::{ConfigLoader, CONFIG_FILE_NAME};
use sif_adk::provisioning::{MessagingMode, ProvisioningMode};
use sif_adk::{AdkError, AdkProperties, SifVersion};
use std::fs;
use std::time::Duration;

#[test]
fn test_config_file_seeds_agent_properties() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"
version = "1.5r1"
default_timeout_ms = 5000

[messaging]
mode = "push"
max_buffer_size = 65536

[provisioning]
mode = "agent"
ignore_errors = true

[transport]
protocol = "https"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(dir.path()).unwrap();
    let agent = config.agent_properties().unwrap();
    assert_eq!(agent.messaging_mode(), MessagingMode::Push);
    assert_eq!(agent.max_buffer_size(), 65_536);
    assert_eq!(agent.provisioning_mode(), ProvisioningMode::Agent);
    assert!(agent.ignore_provisioning_errors());
    assert_eq!(agent.transport_protocol(), "https");
    assert_eq!(agent.default_timeout(), Duration::from_millis(5_000));
    assert_eq!(agent.sif_version(), SifVersion::SIF15R1);

    let zone = agent.zone_properties();
    assert_eq!(zone.messaging_mode(), MessagingMode::Push);
}

#[test]
fn test_missing_required_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigLoader::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AdkError::Config(_))));
}

#[test]
fn test_unknown_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.toml");
    fs::write(&path, "[messaging]\nmode = \"carrier-pigeon\"\n").unwrap();
    assert!(ConfigLoader::load_from_file(&path).is_err());
}
