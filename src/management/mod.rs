//! Management-interface client.
//!
//! `JmxClient` resolves beans by name pattern and reads their attributes
//! through an `MBeanConnector`. The `memory` submodule aggregates peak
//! heap usage over a cluster of nodes.

mod connector;
pub mod memory;

pub use crate::management::connector::{JmxTermConnector, MBeanConnector};
use crate::errors::HarnessError;
use failure::{Fallible, ResultExt};
use regex::Regex;

/// A resolved management bean.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MBean {
    name: String,
}

impl MBean {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Client for a single node's management interface.
#[derive(Debug)]
pub struct JmxClient<C> {
    connector: C,
}

impl<C: MBeanConnector> JmxClient<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn node(&self) -> &str {
        self.connector.node()
    }

    /// Resolve the first bean in `domain` whose name matches `pattern`.
    ///
    /// Several beans may match; all but the first are ignored.
    pub fn find_mbean(&self, pattern: &str, domain: &str) -> Fallible<MBean> {
        self.find_mbean_excluding(pattern, None, domain)
    }

    /// Like `find_mbean`, skipping candidates that match `negative`.
    pub fn find_mbean_excluding(
        &self,
        pattern: &str,
        negative: Option<&str>,
        domain: &str,
    ) -> Fallible<MBean> {
        let positive =
            Regex::new(pattern).context(format!("invalid mbean pattern '{}'", pattern))?;
        let negative = match negative {
            Some(n) => Some(Regex::new(n).context(format!("invalid mbean pattern '{}'", n))?),
            None => None,
        };
        let not_found = || HarnessError::AttributeNotFound {
            node: self.node().to_string(),
            pattern: pattern.to_string(),
            domain: domain.to_string(),
        };

        let beans = match self.connector.list_beans(domain) {
            Ok(beans) => beans,
            Err(e) => {
                warn!("node '{}': failed to list mbeans: {}", self.node(), e);
                return Err(not_found().into());
            }
        };

        let name = beans
            .iter()
            .filter_map(|line| positive.find(line).map(|m| m.as_str().trim()))
            .find(|name| negative.as_ref().map_or(true, |n| !n.is_match(name)))
            .ok_or_else(not_found)?;
        trace!("node '{}': resolved mbean '{}'", self.node(), name);

        Ok(MBean {
            name: name.to_string(),
        })
    }

    /// Read `attribute` of `bean`, as a lazy sequence of raw values.
    ///
    /// Each call issues a fresh query.
    pub fn mbean_attribute(&self, bean: &MBean, attribute: &str) -> Fallible<AttributeValues> {
        let lines = self.connector.read_attribute(&bean.name, attribute)?;
        Ok(AttributeValues {
            bean: bean.name.clone(),
            attribute: attribute.to_string(),
            lines: lines.into_iter(),
        })
    }
}

/// Values of one bean attribute, parsed on demand from query output.
#[derive(Debug)]
pub struct AttributeValues {
    bean: String,
    attribute: String,
    lines: std::vec::IntoIter<String>,
}

impl AttributeValues {
    /// Take the first value, failing with `NoValue` if there is none.
    pub fn first(mut self) -> Fallible<String> {
        match self.next() {
            Some(value) => Ok(value),
            None => Err(HarnessError::NoValue {
                bean: self.bean,
                attribute: self.attribute,
            }
            .into()),
        }
    }
}

impl Iterator for AttributeValues {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let attribute = &self.attribute;
        self.lines
            .by_ref()
            .filter_map(|line| parse_value(attribute, &line))
            .next()
    }
}

/// Extract a value from an `<attribute> = <value>;` output line.
///
/// Lines without the attribute prefix are taken as bare values; blank
/// lines carry nothing.
fn parse_value(attribute: &str, line: &str) -> Option<String> {
    let line = line.trim();
    let value = match line.strip_prefix(attribute) {
        Some(rest) if rest.trim_start().starts_with('=') => rest.trim_start()[1..].trim(),
        _ => line,
    };
    let value = value.trim_end_matches(';').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::MBeanConnector;
    use failure::Fallible;
    use std::collections::HashMap;

    /// In-memory management endpoint.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct FakeConnector {
        pub(crate) node: String,
        pub(crate) beans: HashMap<String, Vec<String>>,
        pub(crate) attributes: HashMap<(String, String), Vec<String>>,
        pub(crate) unreachable: bool,
    }

    impl FakeConnector {
        pub(crate) fn new(node: &str) -> Self {
            Self {
                node: node.to_string(),
                ..Self::default()
            }
        }

        pub(crate) fn with_bean(mut self, domain: &str, bean: &str) -> Self {
            self.beans
                .entry(domain.to_string())
                .or_insert_with(Vec::new)
                .push(bean.to_string());
            self
        }

        pub(crate) fn with_attribute(mut self, bean: &str, attribute: &str, lines: &[&str]) -> Self {
            let lines = lines.iter().map(|l| l.to_string()).collect();
            self.attributes
                .insert((bean.to_string(), attribute.to_string()), lines);
            self
        }

        pub(crate) fn unreachable(mut self) -> Self {
            self.unreachable = true;
            self
        }
    }

    impl MBeanConnector for FakeConnector {
        fn node(&self) -> &str {
            &self.node
        }

        fn list_beans(&self, domain: &str) -> Fallible<Vec<String>> {
            if self.unreachable {
                bail!("connection refused");
            }
            Ok(self.beans.get(domain).cloned().unwrap_or_default())
        }

        fn read_attribute(&self, bean: &str, attribute: &str) -> Fallible<Vec<String>> {
            if self.unreachable {
                bail!("connection refused");
            }
            let key = (bean.to_string(), attribute.to_string());
            Ok(self.attributes.get(&key).cloned().unwrap_or_default())
        }
    }
}
