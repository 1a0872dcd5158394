//! SIF ADK: data model core for Schools Interoperability Framework agents
//!
//! Typed values and their wire formatters for both SIF protocol eras, element
//! trees with change tracking, chained agent/zone properties, exception
//! aggregation for fail-late batches, and the provisioning and messaging
//! contracts agents implement.

pub mod config;
pub mod element;
pub mod error;
pub mod exception;
pub mod logging;
pub mod messaging;
pub mod properties;
pub mod provisioning;
pub mod query;
pub mod schema;
pub mod value;
pub mod version;

pub use element::{Element, ElementTree, SifElement, SimpleField};
pub use error::{AdkError, ParseError, Result};
pub use exception::AdkException;
pub use properties::{AdkProperties, AgentProperties, PropertyChain, ZoneProperties};
pub use schema::{DefHandle, SchemaRegistry};
pub use value::{SifDataType, SifValue};
pub use version::SifVersion;
