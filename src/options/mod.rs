//! Optional configuration features.
//!
//! Each option knows how to detect from globals whether it is requested,
//! and how to fold itself into an `IgniteConfiguration`. The set of
//! options is closed: adding one means adding a variant here.

use crate::config::IgniteConfiguration;
use crate::globals::GlobalSettings;
use failure::{Error, Fallible};
use std::fmt;
use std::str::FromStr;

mod jmx;
pub use jmx::JmxMetrics;

mod opencensus;
pub use opencensus::OpencensusMetrics;

mod ssl;
pub use ssl::{SslParams, SslRole};

/// Globals key grouping all metric exporters.
pub static METRICS_KEY: &str = "metrics";

/// Metrics update frequency applied when an exporter needs one.
pub const DEFAULT_METRICS_UPDATE_FREQUENCY: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigOption {
    Opencensus,
    Jmx,
    Ssl,
}

impl ConfigOption {
    /// All options, in declaration order.
    pub const ALL: [ConfigOption; 3] = [ConfigOption::Opencensus, ConfigOption::Jmx, ConfigOption::Ssl];

    /// Options enabled in `globals`, in declaration order.
    pub fn enabled_in(globals: &GlobalSettings) -> Vec<ConfigOption> {
        Self::ALL
            .iter()
            .cloned()
            .filter(|opt| opt.enabled(globals))
            .collect()
    }

    /// Globals key for this option.
    pub fn key(self) -> &'static str {
        match self {
            ConfigOption::Opencensus => opencensus::OPENCENSUS_KEY,
            ConfigOption::Jmx => jmx::JMX_KEY,
            ConfigOption::Ssl => ssl::SSL_KEY,
        }
    }

    /// Whether this option is requested in `globals`.
    pub fn enabled(self, globals: &GlobalSettings) -> bool {
        match self {
            ConfigOption::Opencensus => OpencensusMetrics::enabled(globals),
            ConfigOption::Jmx => JmxMetrics::enabled(globals),
            ConfigOption::Ssl => SslParams::enabled(globals),
        }
    }

    /// Fold this option into `config`.
    ///
    /// Callers are expected to check `enabled` first: options carrying a
    /// parameter bundle fail with `ConfigMisuse` when disabled.
    pub fn add_to_config(
        self,
        config: IgniteConfiguration,
        globals: &GlobalSettings,
    ) -> Fallible<IgniteConfiguration> {
        match self {
            ConfigOption::Opencensus => OpencensusMetrics::add_to_config(config, globals),
            ConfigOption::Jmx => Ok(JmxMetrics::add_to_config(config)),
            ConfigOption::Ssl => SslParams::add_to_config(config, globals),
        }
    }
}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigOption {
    type Err = Error;

    fn from_str(input: &str) -> Fallible<Self> {
        match Self::ALL.iter().find(|opt| opt.key() == input) {
            Some(opt) => Ok(*opt),
            None => bail!("unsupported option '{}'", input),
        }
    }
}
