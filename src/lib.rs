//! ducktests: configuration composition and metric extraction for
//! black-box cluster tests.
//!
//! Test scenarios drive an external Ignite cluster; this library covers
//! the two pieces that need real design:
//!  * composing a node configuration from global test settings, layering
//!    optional features (metric exporters, SSL) without conflicts;
//!  * reading runtime metrics from each node's management interface and
//!    aggregating them across the cluster.
//!
//! Process lifecycle, version negotiation and result reporting are left
//! to the calling test framework.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod errors;
pub mod globals;
pub mod management;
pub mod options;
pub mod settings;

pub use crate::config::{ConfigComposer, IgniteConfiguration};
pub use crate::errors::HarnessError;
pub use crate::globals::GlobalSettings;
pub use crate::options::ConfigOption;
