//! GHS hazard code extraction and severity classification.
//!
//! - [`walker`]: finds "GHS Hazard Statements" records anywhere in a JSON tree.
//! - [`extractor`]: turns statement text into canonical [`models::HazardCode`]s.
//! - [`hazard`]: rule table, classifier and the [`hazard::assess`] pipeline.
//! - [`registry`]: PubChem client and local-file source for records.
//! - [`config`]: TOML configuration and rule table overrides.
//! - [`report`]: terminal and JSON output.

pub mod config;
pub mod extractor;
pub mod hazard;
pub mod models;
pub mod registry;
pub mod report;
pub mod walker;
