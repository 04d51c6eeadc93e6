use crate::options::OpencensusMetrics;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

/// Bean definition rendered into the node's startup configuration.
///
/// Used as a metric exporter identifier: a fixed class name plus runtime
/// properties. Two beans are equal iff both class and properties match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Bean {
    pub class_name: String,
    pub properties: BTreeMap<String, String>,
}

impl Bean {
    pub fn new<S: Into<String>>(class_name: S) -> Self {
        Self {
            class_name: class_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Set a property, rendered to its string form.
    pub fn with_property<K: Into<String>, V: ToString>(mut self, name: K, value: V) -> Self {
        self.properties.insert(name.into(), value.to_string());
        self
    }
}

impl fmt::Display for Bean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let props = self
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .join(", ");
        write!(f, "{}({})", self.class_name, props)
    }
}

/// Parameter bundle of an extension record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtParams {
    Opencensus(OpencensusMetrics),
}

impl ExtParams {
    /// Bundle name, the uniqueness key among extension records.
    pub fn name(&self) -> &str {
        match self {
            ExtParams::Opencensus(p) => &p.name,
        }
    }
}

/// Extension record: a template plus the parameters it is rendered with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtBean {
    pub template: String,
    pub params: ExtParams,
}

impl ExtBean {
    pub fn new<S: Into<String>>(template: S, params: ExtParams) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bean_display() {
        let bean = Bean::new("a.b.C")
            .with_property("period", 1000)
            .with_property("enabled", true);
        assert_eq!(bean.to_string(), "a.b.C(enabled=true, period=1000)");
        assert_eq!(Bean::new("a.b.D").to_string(), "a.b.D()");
    }

    #[test]
    fn bean_equality_includes_properties() {
        let one = Bean::new("X").with_property("period", 1);
        let two = Bean::new("X").with_property("period", 2);
        assert_ne!(one, two);
        assert_eq!(one, Bean::new("X").with_property("period", "1"));
    }
}
