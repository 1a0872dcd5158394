//! Integration tests for the SIF ADK data model

mod common;
mod config_loading;
mod exception_aggregation;
mod keyed_lists;
mod property_chain;
mod publishing;
mod record_round_trip;
mod value_round_trip;
