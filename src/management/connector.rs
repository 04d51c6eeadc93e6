//! Transports to a node's management interface.

use crate::settings::{JmxSettings, NodeSettings};
use failure::{Fallible, ResultExt};
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Raw access to one node's management beans.
///
/// Results are untyped output lines; interpreting them is up to
/// `JmxClient`.
pub trait MBeanConnector {
    /// Name of the node this connector talks to.
    fn node(&self) -> &str;

    /// List the names of beans registered under `domain`.
    fn list_beans(&self, domain: &str) -> Fallible<Vec<String>>;

    /// Read `attribute` (dot-separated for nested values) of bean `bean`.
    fn read_attribute(&self, bean: &str, attribute: &str) -> Fallible<Vec<String>>;
}

/// Connector driving a jmxterm session, optionally through a remote shell.
///
/// Every call opens its own session: a script with `open`, one query and
/// `close` is fed to the jmxterm command on stdin.
#[derive(Clone, Debug)]
pub struct JmxTermConnector {
    node: String,
    host: String,
    target: String,
    command: Vec<String>,
    remote_shell: Vec<String>,
}

impl JmxTermConnector {
    pub fn new(node: &NodeSettings, jmx: &JmxSettings) -> Self {
        Self {
            node: node.name.clone(),
            host: node.host.clone(),
            target: node.target.clone(),
            command: jmx.command.clone(),
            remote_shell: jmx.remote_shell.clone(),
        }
    }

    /// Full argument vector: remote shell and host (if any), then jmxterm.
    fn argv(&self) -> Vec<String> {
        let mut argv = vec![];
        if !self.remote_shell.is_empty() && !self.host.is_empty() {
            argv.extend(self.remote_shell.iter().cloned());
            argv.push(self.host.clone());
        }
        argv.extend(self.command.iter().cloned());
        argv
    }

    fn script(&self, query: &str) -> String {
        format!("open {}\n{}\nclose\n", self.target, query)
    }

    fn run(&self, query: &str) -> Fallible<Vec<String>> {
        let argv = self.argv();
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| format_err!("empty jmxterm command"))?;
        trace!("node '{}': running {:?} with query '{}'", self.node, argv, query);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context(format!("failed to spawn '{}'", program))?;
        if let Err(e) = feed_stdin(&mut child, &self.script(query)) {
            reap(&mut child);
            return Err(e);
        }

        let output = child
            .wait_with_output()
            .context("failed to wait for jmxterm")?;
        if !output.status.success() {
            bail!(
                "jmxterm on node '{}' failed ({}): {}",
                self.node,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_owned)
            .collect();
        Ok(lines)
    }
}

/// Write `script` to the child's stdin, then close it.
fn feed_stdin(child: &mut Child, script: &str) -> Fallible<()> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| format_err!("jmxterm stdin unavailable"))?;
    stdin
        .write_all(script.as_bytes())
        .context("failed to write jmxterm script")?;
    Ok(())
}

/// Kill and wait a child that will not be fed.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!("failed to kill jmxterm (pid {}): {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        warn!("failed to wait jmxterm (pid {}): {}", child.id(), e);
    }
}

impl MBeanConnector for JmxTermConnector {
    fn node(&self) -> &str {
        &self.node
    }

    fn list_beans(&self, domain: &str) -> Fallible<Vec<String>> {
        self.run(&format!("beans -d {}", domain))
    }

    fn read_attribute(&self, bean: &str, attribute: &str) -> Fallible<Vec<String>> {
        self.run(&format!("get -b {} {}", bean, attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(host: &str, command: Vec<&str>, remote_shell: Vec<&str>) -> JmxTermConnector {
        let node = NodeSettings {
            name: "server-1".to_string(),
            host: host.to_string(),
            target: "localhost:1098".to_string(),
        };
        let jmx = JmxSettings {
            command: command.into_iter().map(String::from).collect(),
            remote_shell: remote_shell.into_iter().map(String::from).collect(),
        };
        JmxTermConnector::new(&node, &jmx)
    }

    #[test]
    fn argv_with_remote_shell() {
        let conn = connector("ducker01", vec!["jmxterm", "-n"], vec!["ssh", "-q"]);
        assert_eq!(conn.argv(), vec!["ssh", "-q", "ducker01", "jmxterm", "-n"]);

        let local = connector("", vec!["jmxterm", "-n"], vec!["ssh"]);
        assert_eq!(local.argv(), vec!["jmxterm", "-n"]);
    }

    #[test]
    fn script_wraps_query() {
        let conn = connector("", vec!["jmxterm"], vec![]);
        assert_eq!(
            conn.script("beans -d java.lang"),
            "open localhost:1098\nbeans -d java.lang\nclose\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_command_and_collects_lines() {
        // `cat` echoes the script back, standing in for jmxterm.
        let conn = connector("", vec!["cat"], vec![]);
        let lines = conn.list_beans("java.lang").unwrap();
        assert_eq!(lines, vec!["open localhost:1098", "beans -d java.lang", "close"]);
    }

    #[cfg(unix)]
    #[test]
    fn unfed_child_is_reaped() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .spawn()
            .unwrap();
        assert!(feed_stdin(&mut child, "open 1\n").is_err());

        reap(&mut child);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command() {
        let conn = connector("", vec!["false"], vec![]);
        assert!(conn.read_attribute("java.lang:type=Memory", "HeapMemoryUsage.used").is_err());
        let empty = connector("", vec![], vec![]);
        assert!(empty.list_beans("java.lang").is_err());
    }
}
