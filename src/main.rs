//! ducktests: configuration and metrics helper for cluster tests.
//!
//! Two subcommands:
//!  * `compose` - fold enabled options from globals into a node
//!    configuration and print it as JSON, for the process launcher.
//!  * `peak-heap` - read peak heap usage from every configured node and
//!    print the per-node summary as JSON, for the result reporter.

#[macro_use]
extern crate log;

use ducktests::management::{memory, JmxTermConnector};
use ducktests::settings::{HarnessSettings, DEFAULT_DIRS};
use ducktests::{ConfigComposer, ConfigOption, GlobalSettings, IgniteConfiguration};
use failure::{Fallible, ResultExt};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "ducktests")]
enum CliCommand {
    /// Compose a node configuration from globals.
    #[structopt(name = "compose")]
    Compose {
        /// Globals, as a JSON file path or inline JSON (repeatable, later wins).
        #[structopt(long = "globals")]
        globals: Vec<String>,
        /// Option to apply, in order (default: every enabled option).
        #[structopt(long = "option")]
        options: Vec<ConfigOption>,
        /// Compose a client-node configuration.
        #[structopt(long = "client")]
        client: bool,
        /// Configuration directory (repeatable, later wins).
        #[structopt(long = "config-dir")]
        config_dirs: Vec<String>,
    },
    /// Print peak heap usage of every configured node, in GiB.
    #[structopt(name = "peak-heap")]
    PeakHeap {
        /// Configuration directory (repeatable, later wins).
        #[structopt(long = "config-dir")]
        config_dirs: Vec<String>,
    },
}

fn main() -> Fallible<()> {
    env_logger::Builder::from_default_env().try_init()?;

    match CliCommand::from_args() {
        CliCommand::Compose {
            globals,
            options,
            client,
            config_dirs,
        } => compose(&globals, options, client, &config_dirs),
        CliCommand::PeakHeap { config_dirs } => peak_heap(&config_dirs),
    }
}

fn read_settings(config_dirs: &[String]) -> Fallible<HarnessSettings> {
    if config_dirs.is_empty() {
        HarnessSettings::read_config(&DEFAULT_DIRS)
    } else {
        HarnessSettings::read_config(config_dirs)
    }
}

fn compose(
    sources: &[String],
    options: Vec<ConfigOption>,
    client: bool,
    config_dirs: &[String],
) -> Fallible<()> {
    let settings = read_settings(config_dirs)?;
    let globals: GlobalSettings = settings
        .globals
        .merge(GlobalSettings::read_globals(sources)?);

    let composer = if options.is_empty() {
        ConfigComposer::enabled(&globals)
    } else {
        ConfigComposer::new(&globals).with_options(options)
    };
    info!(
        "composing configuration with options {:?}",
        composer.options()
    );

    let initial = if client {
        IgniteConfiguration::client()
    } else {
        IgniteConfiguration::new()
    };
    let config = composer.compose(initial)?;

    let out = serde_json::to_string_pretty(&config).context("failed to serialize configuration")?;
    println!("{}", out);
    Ok(())
}

fn peak_heap(config_dirs: &[String]) -> Fallible<()> {
    let settings = read_settings(config_dirs)?;
    if settings.nodes.is_empty() {
        warn!("no nodes configured");
    }

    let connectors = settings
        .nodes
        .iter()
        .map(|node| JmxTermConnector::new(node, &settings.jmx));
    let usage = memory::peak_heap_usage(connectors)?;

    let out = serde_json::to_string_pretty(&usage).context("failed to serialize usage")?;
    println!("{}", out);
    Ok(())
}
