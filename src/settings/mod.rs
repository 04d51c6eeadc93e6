//! Harness configuration parsing and validation.
//!
//! This module contains three logical entities:
//!  * Snippets: single TOML files, holding a subset of configuration entries.
//!  * Inputs: configuration snippets merged, but not yet validated.
//!  * HarnessSettings: validated configuration for the harness.

mod inputs;
mod snippets;

use crate::globals::GlobalSettings;
use failure::Fallible;
use std::path::Path;

/// Configuration directories, in increasing priority.
pub static DEFAULT_DIRS: [&str; 3] = ["/usr/lib/ducktests", "/run/ducktests", "/etc/ducktests"];

static DEFAULT_JMXTERM_COMMAND: [&str; 6] = [
    "java",
    "-jar",
    "/opt/jmxterm/jmxterm.jar",
    "-v",
    "silent",
    "-n",
];

/// Validated harness settings.
#[derive(Debug, Serialize)]
pub struct HarnessSettings {
    pub jmx: JmxSettings,
    pub nodes: Vec<NodeSettings>,
    pub globals: GlobalSettings,
}

/// How to reach management endpoints.
#[derive(Clone, Debug, Serialize)]
pub struct JmxSettings {
    /// jmxterm command line.
    pub command: Vec<String>,
    /// Remote shell prefix; empty means jmxterm runs locally.
    pub remote_shell: Vec<String>,
}

/// A node whose management endpoint can be queried.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSettings {
    pub name: String,
    pub host: String,
    /// jmxterm `open` target: a pid or `host:port`.
    pub target: String,
}

impl HarnessSettings {
    /// Read, merge and validate configuration snippets from `dirs`.
    pub fn read_config<P: AsRef<Path>>(dirs: &[P]) -> Fallible<Self> {
        let cfg = inputs::ConfigInput::read_config(dirs)?;
        Self::try_from_input(cfg)
    }

    /// Validate inputs and return valid harness settings.
    fn try_from_input(cfg: inputs::ConfigInput) -> Fallible<Self> {
        let command = if cfg.jmx.command.is_empty() {
            DEFAULT_JMXTERM_COMMAND.iter().map(|s| s.to_string()).collect()
        } else {
            cfg.jmx.command
        };
        let jmx = JmxSettings {
            command,
            remote_shell: cfg.jmx.remote_shell,
        };

        let mut nodes = Vec::with_capacity(cfg.nodes.len());
        for node in cfg.nodes {
            if node.name.is_empty() {
                bail!("node with empty name");
            }
            if node.target.is_empty() {
                bail!("node '{}' has no management target", node.name);
            }
            nodes.push(NodeSettings {
                name: node.name,
                host: node.host,
                target: node.target,
            });
        }

        let globals = match cfg.globals {
            serde_json::Value::Array(snippets) => snippets
                .into_iter()
                .map(GlobalSettings::from)
                .fold(GlobalSettings::default(), GlobalSettings::merge),
            other => GlobalSettings::from(other),
        };

        let settings = Self {
            jmx,
            nodes,
            globals,
        };
        if let Ok(dump) = serde_json::to_string_pretty(&settings) {
            debug!("harness settings:\n{}", dump);
        }

        Ok(settings)
    }
}
