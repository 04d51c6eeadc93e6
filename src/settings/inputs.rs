use crate::settings::snippets;
use failure::{Fallible, ResultExt};
use std::path::{Path, PathBuf};

/// Runtime configuration holding environmental inputs.
#[derive(Debug, Serialize)]
pub(crate) struct ConfigInput {
    pub(crate) jmx: JmxInput,
    pub(crate) nodes: Vec<NodeInput>,
    pub(crate) globals: serde_json::Value,
}

impl ConfigInput {
    /// Read config snippets from `dirs` and merge them into a single config.
    ///
    /// Directories are scanned in order, missing ones are skipped. Within a
    /// directory, `*.toml` files are read in lexicographic order.
    pub(crate) fn read_config<P: AsRef<Path>>(dirs: &[P]) -> Fallible<Self> {
        let mut snips = vec![];
        for dir in dirs {
            for path in snippet_paths(dir.as_ref())? {
                trace!("reading config snippet from {:?}", path);
                let content = std::fs::read(&path)
                    .context(format!("failed to read file '{}'", path.display()))?;
                let snippet: snippets::ConfigSnippet = toml::from_slice(&content)
                    .context(format!("failed to parse TOML in '{}'", path.display()))?;
                snips.push(snippet);
            }
        }

        let cfg = Self::merge_snippets(snips)?;
        if let Ok(dump) = serde_json::to_string_pretty(&cfg) {
            debug!("configuration input:\n{}", dump);
        }

        Ok(cfg)
    }

    /// Merge multiple snippets into a single configuration.
    pub(crate) fn merge_snippets(snippets: Vec<snippets::ConfigSnippet>) -> Fallible<Self> {
        let mut jmxs = vec![];
        let mut nodes = vec![];
        let mut globals = vec![];

        for snip in snippets {
            if let Some(j) = snip.jmx {
                jmxs.push(j);
            }
            if let Some(n) = snip.nodes {
                nodes.extend(n);
            }
            if let Some(g) = snip.globals {
                globals.push(serde_json::to_value(g).context("failed to convert TOML globals")?);
            }
        }

        let cfg = Self {
            jmx: JmxInput::from_snippets(jmxs),
            nodes: NodeInput::from_snippets(nodes),
            globals: serde_json::Value::Array(globals),
        };
        Ok(cfg)
    }
}

fn snippet_paths(dir: &Path) -> Fallible<Vec<PathBuf>> {
    if !dir.is_dir() {
        trace!("skipping missing config directory {:?}", dir);
        return Ok(vec![]);
    }

    let mut paths = vec![];
    for entry in std::fs::read_dir(dir).context(format!("failed to read '{}'", dir.display()))? {
        let path = entry.context("failed to read directory entry")?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[derive(Debug, Serialize)]
pub(crate) struct JmxInput {
    pub(crate) command: Vec<String>,
    pub(crate) remote_shell: Vec<String>,
}

impl JmxInput {
    fn from_snippets(snippets: Vec<snippets::JmxSnippet>) -> Self {
        let mut cfg = Self {
            command: vec![],
            remote_shell: vec![],
        };

        for snip in snippets {
            if let Some(c) = snip.command {
                cfg.command = c;
            }
            if let Some(r) = snip.remote_shell {
                cfg.remote_shell = r;
            }
        }

        cfg
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NodeInput {
    pub(crate) name: String,
    pub(crate) host: String,
    pub(crate) target: String,
}

impl NodeInput {
    /// Nodes in first-seen order; a later snippet for the same name
    /// replaces the earlier one.
    fn from_snippets(snippets: Vec<snippets::NodeSnippet>) -> Vec<Self> {
        let mut nodes: Vec<Self> = vec![];

        for snip in snippets {
            let node = Self {
                name: snip.name,
                host: snip.host.unwrap_or_default(),
                target: snip.target.unwrap_or_default(),
            };
            match nodes.iter_mut().find(|n| n.name == node.name) {
                Some(existing) => *existing = node,
                None => nodes.push(node),
            }
        }

        nodes
    }
}
