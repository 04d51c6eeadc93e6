use crate::config::IgniteConfiguration;
use crate::globals::GlobalSettings;
use crate::options::ConfigOption;
use failure::Fallible;

/// Folds an ordered list of config options over a configuration.
///
/// Options are applied in the order they were added; since extension
/// records are first-write-wins by bundle name, order is significant.
#[derive(Clone, Debug)]
pub struct ConfigComposer<'g> {
    globals: &'g GlobalSettings,
    options: Vec<ConfigOption>,
}

impl<'g> ConfigComposer<'g> {
    /// Composer with no options.
    pub fn new(globals: &'g GlobalSettings) -> Self {
        Self {
            globals,
            options: vec![],
        }
    }

    /// Composer for every option enabled in `globals`, in declaration order.
    pub fn enabled(globals: &'g GlobalSettings) -> Self {
        Self {
            globals,
            options: ConfigOption::enabled_in(globals),
        }
    }

    pub fn with_option(mut self, option: ConfigOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_options<I: IntoIterator<Item = ConfigOption>>(mut self, options: I) -> Self {
        self.options.extend(options);
        self
    }

    pub fn options(&self) -> &[ConfigOption] {
        &self.options
    }

    /// Apply all options to `config`, stopping at the first failure.
    pub fn compose(&self, config: IgniteConfiguration) -> Fallible<IgniteConfiguration> {
        self.options.iter().try_fold(config, |cfg, option| {
            trace!("folding option '{}' into configuration", option);
            option.add_to_config(cfg, self.globals)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HarnessError;
    use serde_json::json;

    fn globals() -> GlobalSettings {
        GlobalSettings::from(json!({
            "metrics": {
                "opencensys": {"enabled": true, "period": 500, "port": 9000},
                "jmx": {"enabled": true},
            }
        }))
    }

    #[test]
    fn enabled_options_in_declaration_order() {
        let globals = globals();
        let composer = ConfigComposer::enabled(&globals);
        assert_eq!(
            composer.options(),
            &[ConfigOption::Opencensus, ConfigOption::Jmx]
        );

        let none = GlobalSettings::default();
        assert!(ConfigComposer::enabled(&none).options().is_empty());
    }

    #[test]
    fn compose_keeps_global_uniqueness() {
        let globals = globals();
        let cfg = ConfigComposer::new(&globals)
            .with_options(vec![
                ConfigOption::Opencensus,
                ConfigOption::Jmx,
                ConfigOption::Opencensus,
                ConfigOption::Jmx,
            ])
            .compose(IgniteConfiguration::new())
            .unwrap();

        assert_eq!(cfg.metrics_update_frequency(), Some(1000));
        assert_eq!(cfg.metric_exporters().len(), 2);
        assert_eq!(cfg.ext_beans().len(), 1);
        assert_eq!(cfg.ext_beans()[0].params.name(), "OpencensysMetrics");
    }

    #[test]
    fn compose_keeps_preset_frequency() {
        let globals = globals();
        let initial = IgniteConfiguration::new().with_metrics_update_frequency(3000);
        let cfg = ConfigComposer::enabled(&globals).compose(initial).unwrap();
        assert_eq!(cfg.metrics_update_frequency(), Some(3000));
    }

    #[test]
    fn compose_without_options_is_identity() {
        let globals = globals();
        let initial = IgniteConfiguration::client().with_metrics_update_frequency(7);
        let cfg = ConfigComposer::new(&globals).compose(initial.clone()).unwrap();
        assert_eq!(cfg, initial);
    }

    #[test]
    fn compose_fails_on_disabled_option() {
        let globals = GlobalSettings::from(json!({"metrics": {"jmx": {"enabled": true}}}));
        let err = ConfigComposer::new(&globals)
            .with_option(ConfigOption::Jmx)
            .with_option(ConfigOption::Opencensus)
            .compose(IgniteConfiguration::new())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<HarnessError>(),
            Some(&HarnessError::ConfigMisuse {
                option: "opencensys".to_string()
            })
        );
    }
}
