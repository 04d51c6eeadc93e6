use crate::config::{ClientConnectorConfiguration, IgniteConfiguration};
use crate::errors::HarnessError;
use crate::globals::{GlobalSettings, ENABLED_KEY};
use failure::Fallible;

pub(crate) static SSL_KEY: &str = "ssl";
static SSL_PARAMS_KEY: &str = "params";

static DEFAULT_PASSWORD: &str = "123456";
static DEFAULT_TRUSTSTORE: &str = "truststore.jks";

/// Certificate owner, selecting the default key store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SslRole {
    Server,
    Client,
}

impl SslRole {
    fn key(self) -> &'static str {
        match self {
            SslRole::Server => "server",
            SslRole::Client => "client",
        }
    }

    fn default_key_store(self) -> &'static str {
        match self {
            SslRole::Server => "server.jks",
            SslRole::Client => "client.jks",
        }
    }
}

/// Key and trust store settings for one role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SslParams {
    pub key_store_jks: String,
    pub key_store_password: String,
    pub trust_store_jks: String,
    pub trust_store_password: String,
}

impl SslParams {
    pub fn enabled(globals: &GlobalSettings) -> bool {
        globals.is_enabled(&[SSL_KEY, ENABLED_KEY])
    }

    /// Extract parameters for `role` from `ssl.params.<role>`, if enabled.
    pub fn from_globals(globals: &GlobalSettings, role: SslRole) -> Fallible<Option<Self>> {
        if !Self::enabled(globals) {
            return Ok(None);
        }

        let field = |name: &str, default: &str| -> Fallible<String> {
            let value = globals.lookup_str(&[SSL_KEY, SSL_PARAMS_KEY, role.key(), name])?;
            Ok(value.unwrap_or(default).to_string())
        };

        let params = Self {
            key_store_jks: field("key_store_jks", role.default_key_store())?,
            key_store_password: field("key_store_password", DEFAULT_PASSWORD)?,
            trust_store_jks: field("trust_store_jks", DEFAULT_TRUSTSTORE)?,
            trust_store_password: field("trust_store_password", DEFAULT_PASSWORD)?,
        };
        Ok(Some(params))
    }

    /// Fold SSL settings into `config`.
    ///
    /// Node parameters are only set if still unset; a configured client
    /// connector without SSL gets it turned on with client parameters.
    pub fn add_to_config(
        config: IgniteConfiguration,
        globals: &GlobalSettings,
    ) -> Fallible<IgniteConfiguration> {
        let misuse = || HarnessError::ConfigMisuse {
            option: SSL_KEY.to_string(),
        };
        let role = if config.client_mode() {
            SslRole::Client
        } else {
            SslRole::Server
        };
        let node_params = Self::from_globals(globals, role)?.ok_or_else(misuse)?;

        let connector = match config.client_connector() {
            Some(conn) if !conn.ssl_enabled => {
                let params = Self::from_globals(globals, SslRole::Client)?.ok_or_else(misuse)?;
                Some(ClientConnectorConfiguration {
                    ssl_enabled: true,
                    ssl_params: Some(params),
                    ..conn.clone()
                })
            }
            _ => None,
        };

        let config = config.with_default_ssl_params(node_params);
        let config = match connector {
            Some(conn) => config.with_client_connector(conn),
            None => config,
        };
        Ok(config)
    }
}
