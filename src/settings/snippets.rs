/// Top-level configuration stanza.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigSnippet {
    /// Management client configuration.
    pub(crate) jmx: Option<JmxSnippet>,
    /// Cluster nodes to query.
    pub(crate) nodes: Option<Vec<NodeSnippet>>,
    /// Global test settings, merged under command-line globals.
    pub(crate) globals: Option<toml::Value>,
}

/// Config snippet for the jmxterm connector.
#[derive(Debug, Deserialize)]
pub(crate) struct JmxSnippet {
    /// jmxterm command line (default: `java -jar /opt/jmxterm/jmxterm.jar -v silent -n`)
    pub(crate) command: Option<Vec<String>>,
    /// Remote shell prefix, the node host is appended to it (default: none)
    pub(crate) remote_shell: Option<Vec<String>>,
}

/// Config snippet for a single node.
#[derive(Debug, Deserialize)]
pub(crate) struct NodeSnippet {
    pub(crate) name: String,
    /// Host to reach through the remote shell.
    pub(crate) host: Option<String>,
    /// jmxterm `open` target: a pid or `host:port`.
    pub(crate) target: Option<String>,
}
