//! Source composition for agent configuration

mod merge_policy;
pub(crate) mod service;
