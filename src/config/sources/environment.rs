//! Environment variable source: ADK__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use std::collections::HashMap;

/// Add environment variable overlay to builder.
/// Uses the ADK prefix and `__` as separator for nested keys, so
/// `ADK__MESSAGING__MODE` sets `messaging.mode`. `vars` stands in for the
/// process environment when given.
///
/// Values stay strings; typed fields are parsed on deserialization, so
/// `ADK__VERSION=2.0` is not read as a float.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<HashMap<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("ADK")
            .separator("__")
            .source(vars),
    )
}
