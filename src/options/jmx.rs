use super::{DEFAULT_METRICS_UPDATE_FREQUENCY, METRICS_KEY};
use crate::config::{Bean, IgniteConfiguration};
use crate::globals::{GlobalSettings, ENABLED_KEY};

pub(crate) static JMX_KEY: &str = "jmx";
static JMX_EXPORTER: &str = "org.apache.ignite.spi.metric.jmx.JmxMetricExporterSpi";

/// JMX metric exporter, without tunables.
#[derive(Clone, Copy, Debug)]
pub struct JmxMetrics;

impl JmxMetrics {
    pub fn enabled(globals: &GlobalSettings) -> bool {
        globals.is_enabled(&[METRICS_KEY, JMX_KEY, ENABLED_KEY])
    }

    pub fn add_to_config(config: IgniteConfiguration) -> IgniteConfiguration {
        config
            .with_default_metrics_update_frequency(DEFAULT_METRICS_UPDATE_FREQUENCY)
            .with_metric_exporter(Bean::new(JMX_EXPORTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enabled_flag() {
        let on = GlobalSettings::from(json!({"metrics": {"jmx": {"enabled": true}}}));
        let off = GlobalSettings::from(json!({"metrics": {"jmx": {"enabled": false}}}));
        assert!(JmxMetrics::enabled(&on));
        assert!(!JmxMetrics::enabled(&off));
    }

    #[test]
    fn add_twice_is_idempotent() {
        let cfg = JmxMetrics::add_to_config(JmxMetrics::add_to_config(IgniteConfiguration::new()));
        assert_eq!(cfg.metric_exporters().len(), 1);
        assert!(cfg.metric_exporters().contains(&Bean::new(JMX_EXPORTER)));
        assert_eq!(cfg.metrics_update_frequency(), Some(1000));
        assert!(cfg.ext_beans().is_empty());
    }
}
