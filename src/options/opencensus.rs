use super::{DEFAULT_METRICS_UPDATE_FREQUENCY, METRICS_KEY};
use crate::config::{Bean, ExtBean, ExtParams, IgniteConfiguration};
use crate::errors::HarnessError;
use crate::globals::{GlobalSettings, ENABLED_KEY};
use failure::Fallible;

pub(crate) static OPENCENSUS_KEY: &str = "opencensys";
static OPENCENSUS_TEMPLATE_FILE: &str = "opencensys_metrics_beans_macro.j2";
static OPENCENSUS_EXPORTER: &str = "org.apache.ignite.spi.metric.opencensus.OpenCensusMetricExporterSpi";

/// Bundle name of the OpenCensus extension record.
pub static OPENCENSUS_NAME: &str = "OpencensysMetrics";

const DEFAULT_PERIOD: u64 = 1000;
const DEFAULT_PORT: u16 = 8082;

/// OpenCensus exporter parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpencensusMetrics {
    /// Export period, in milliseconds.
    pub period: u64,
    /// Port the metrics are served on.
    pub port: u16,
    pub name: String,
}

impl OpencensusMetrics {
    pub fn enabled(globals: &GlobalSettings) -> bool {
        globals.is_enabled(&[METRICS_KEY, OPENCENSUS_KEY, ENABLED_KEY])
    }

    /// Extract parameters from globals, if enabled.
    ///
    /// Missing `period` and `port` take their defaults; present but
    /// malformed ones are an error.
    pub fn from_globals(globals: &GlobalSettings) -> Fallible<Option<Self>> {
        if !Self::enabled(globals) {
            return Ok(None);
        }

        let period = globals
            .lookup_u64(&[METRICS_KEY, OPENCENSUS_KEY, "period"])?
            .unwrap_or(DEFAULT_PERIOD);
        let port = match globals.lookup_u64(&[METRICS_KEY, OPENCENSUS_KEY, "port"])? {
            None => DEFAULT_PORT,
            Some(p) if p <= u64::from(u16::max_value()) => p as u16,
            Some(p) => {
                return Err(HarnessError::InvalidGlobal {
                    path: format!("{}.{}.port", METRICS_KEY, OPENCENSUS_KEY),
                    reason: format!("port {} out of range", p),
                }
                .into())
            }
        };

        let params = Self {
            period,
            port,
            name: OPENCENSUS_NAME.to_string(),
        };
        Ok(Some(params))
    }

    pub fn add_to_config(
        config: IgniteConfiguration,
        globals: &GlobalSettings,
    ) -> Fallible<IgniteConfiguration> {
        let params = Self::from_globals(globals)?.ok_or_else(|| HarnessError::ConfigMisuse {
            option: OPENCENSUS_KEY.to_string(),
        })?;
        trace!("opencensus exporter parameters: {:?}", params);

        let exporter = Bean::new(OPENCENSUS_EXPORTER).with_property("period", params.period);
        let ext = ExtBean::new(OPENCENSUS_TEMPLATE_FILE, ExtParams::Opencensus(params));

        let config = config
            .with_default_metrics_update_frequency(DEFAULT_METRICS_UPDATE_FREQUENCY)
            .with_metric_exporter(exporter)
            .with_ext_bean(ext);
        Ok(config)
    }
}
