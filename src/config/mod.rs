//! Node configuration model.
//!
//! This module contains three logical entities:
//!  * `IgniteConfiguration`: one node's (or client's) full configuration,
//!    handed over to the external process launcher.
//!  * `Bean` / `ExtBean`: exporter identifiers and extension records.
//!  * `ConfigComposer`: folds config options over a configuration.
//!
//! `IgniteConfiguration` is a value type: every update consumes the
//! current value and returns the next one, so a half-updated instance is
//! never observable.

mod bean;
mod composer;

pub use crate::config::bean::{Bean, ExtBean, ExtParams};
pub use crate::config::composer::ConfigComposer;
use crate::options::SslParams;
use std::collections::BTreeSet;

/// Default thin-client connector port.
pub const DEFAULT_CLIENT_CONNECTOR_PORT: u16 = 10800;

/// Full configuration of a single node or client.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IgniteConfiguration {
    client_mode: bool,
    metrics_update_frequency: Option<u64>,
    metric_exporters: BTreeSet<Bean>,
    ext_beans: Vec<ExtBean>,
    ssl_params: Option<SslParams>,
    client_connector: Option<ClientConnectorConfiguration>,
}

/// Thin-client connector settings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientConnectorConfiguration {
    pub port: u16,
    pub ssl_enabled: bool,
    pub ssl_params: Option<SslParams>,
}

impl Default for ClientConnectorConfiguration {
    fn default() -> Self {
        Self {
            port: DEFAULT_CLIENT_CONNECTOR_PORT,
            ssl_enabled: false,
            ssl_params: None,
        }
    }
}

impl IgniteConfiguration {
    /// Empty server-node configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty client-node configuration.
    pub fn client() -> Self {
        Self {
            client_mode: true,
            ..Self::default()
        }
    }

    pub fn client_mode(&self) -> bool {
        self.client_mode
    }

    pub fn metrics_update_frequency(&self) -> Option<u64> {
        self.metrics_update_frequency
    }

    pub fn metric_exporters(&self) -> &BTreeSet<Bean> {
        &self.metric_exporters
    }

    pub fn ext_beans(&self) -> &[ExtBean] {
        &self.ext_beans
    }

    pub fn ssl_params(&self) -> Option<&SslParams> {
        self.ssl_params.as_ref()
    }

    pub fn client_connector(&self) -> Option<&ClientConnectorConfiguration> {
        self.client_connector.as_ref()
    }

    /// Whether an extension record with bundle `name` is present.
    pub fn has_ext_bean(&self, name: &str) -> bool {
        self.ext_beans.iter().any(|ext| ext.params.name() == name)
    }

    /// Set the metrics update frequency, overriding any previous value.
    pub fn with_metrics_update_frequency(mut self, millis: u64) -> Self {
        self.metrics_update_frequency = Some(millis);
        self
    }

    /// Set the metrics update frequency only if still unset.
    pub fn with_default_metrics_update_frequency(mut self, millis: u64) -> Self {
        if self.metrics_update_frequency.is_none() {
            self.metrics_update_frequency = Some(millis);
        }
        self
    }

    /// Add a metric exporter; adding one already present is a no-op.
    pub fn with_metric_exporter(mut self, exporter: Bean) -> Self {
        if !self.metric_exporters.insert(exporter) {
            trace!("metric exporter already present, skipping");
        }
        self
    }

    /// Append an extension record, unless one with the same bundle name
    /// is already present (first write wins).
    pub fn with_ext_bean(mut self, ext: ExtBean) -> Self {
        if self.has_ext_bean(ext.params.name()) {
            debug!(
                "extension '{}' already configured, skipping '{}'",
                ext.params.name(),
                ext.template
            );
        } else {
            self.ext_beans.push(ext);
        }
        self
    }

    /// Set node SSL parameters only if still unset.
    pub fn with_default_ssl_params(mut self, params: SslParams) -> Self {
        if self.ssl_params.is_none() {
            self.ssl_params = Some(params);
        }
        self
    }

    pub fn with_client_connector(mut self, connector: ClientConnectorConfiguration) -> Self {
        self.client_connector = Some(connector);
        self
    }
}
