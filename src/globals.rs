//! Global test settings.
//!
//! Globals are a free-form JSON tree supplied by the test runner. They are
//! the single source of truth for which optional features are enabled for
//! a run, and with which parameters. This crate only ever reads them.

use crate::errors::HarnessError;
use failure::{Fallible, ResultExt};
use serde_json::Value;
use std::path::Path;

/// Key holding the on/off switch of a feature.
pub static ENABLED_KEY: &str = "enabled";

/// Read-only nested settings tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlobalSettings {
    root: Value,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            root: Value::Object(Default::default()),
        }
    }
}

impl From<Value> for GlobalSettings {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

impl GlobalSettings {
    /// Parse globals from an inline JSON document.
    pub fn parse(input: &str) -> Fallible<Self> {
        let root: Value = serde_json::from_str(input).context("failed to parse globals JSON")?;
        Ok(Self { root })
    }

    /// Read and merge globals from several sources, in order.
    ///
    /// Each source is either a path to a JSON file or an inline JSON
    /// document. Later sources override earlier ones.
    pub fn read_globals<S: AsRef<str>>(sources: &[S]) -> Fallible<Self> {
        let mut globals = Self::default();
        for src in sources {
            let src = src.as_ref();
            let path = Path::new(src);
            let snippet = if path.is_file() {
                trace!("reading globals from file {:?}", path);
                let content = std::fs::read_to_string(path)
                    .context(format!("failed to read globals file '{}'", src))?;
                Self::parse(&content)?
            } else {
                trace!("parsing inline globals");
                Self::parse(src)?
            };
            globals = globals.merge(snippet);
        }
        Ok(globals)
    }

    /// Deep-merge `other` on top of `self`.
    ///
    /// Objects merge key by key; any other value in `other` replaces the
    /// one in `self`.
    pub fn merge(mut self, other: GlobalSettings) -> Self {
        merge_values(&mut self.root, other.root);
        self
    }

    /// Walk `path` from the root, returning `None` as soon as a key is
    /// missing or an intermediate node is not an object.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.root, |node, key| node.as_object()?.get(*key))
    }

    /// Whether the value at `path` exists and is truthy.
    pub fn is_enabled(&self, path: &[&str]) -> bool {
        self.lookup(path).map_or(false, is_truthy)
    }

    /// Optional unsigned integer at `path`.
    ///
    /// Absent (or null) values are `None`; anything else that is not an
    /// unsigned integer is an `InvalidGlobal` error.
    pub fn lookup_u64(&self, path: &[&str]) -> Fallible<Option<u64>> {
        match self.lookup(path) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => match v.as_u64() {
                Some(n) => Ok(Some(n)),
                None => Err(HarnessError::InvalidGlobal {
                    path: path.join("."),
                    reason: format!("expected unsigned integer, found {}", v),
                }
                .into()),
            },
        }
    }

    /// Optional string at `path`, with the same absent/malformed rules as
    /// `lookup_u64`.
    pub fn lookup_str(&self, path: &[&str]) -> Fallible<Option<&str>> {
        match self.lookup(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(v) => Err(HarnessError::InvalidGlobal {
                path: path.join("."),
                reason: format!("expected string, found {}", v),
            }
            .into()),
        }
    }

    /// Raw tree.
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

/// Truthiness as the test runner's globals understand it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_values(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_missing_paths() {
        let globals = GlobalSettings::from(json!({"metrics": {"jmx": true}, "ssl": 3}));
        assert!(globals.lookup(&["nope"]).is_none());
        assert!(globals.lookup(&["metrics", "opencensys", "enabled"]).is_none());
        // Intermediate scalars are not traversed.
        assert!(globals.lookup(&["metrics", "jmx", "enabled"]).is_none());
        assert!(globals.lookup(&["ssl", "enabled"]).is_none());
        assert!(!globals.is_enabled(&["metrics", "jmx", "enabled"]));
        assert_eq!(globals.lookup(&[]), Some(globals.as_value()));
    }

    #[test]
    fn truthiness() {
        let globals = GlobalSettings::from(json!({
            "t": true, "f": false, "zero": 0, "one": 1,
            "empty": "", "text": "x", "null": null, "list": [], "obj": {"a": 1},
        }));
        assert!(globals.is_enabled(&["t"]));
        assert!(globals.is_enabled(&["one"]));
        assert!(globals.is_enabled(&["text"]));
        assert!(globals.is_enabled(&["obj"]));
        assert!(!globals.is_enabled(&["f"]));
        assert!(!globals.is_enabled(&["zero"]));
        assert!(!globals.is_enabled(&["empty"]));
        assert!(!globals.is_enabled(&["null"]));
        assert!(!globals.is_enabled(&["list"]));
        assert!(!globals.is_enabled(&["missing"]));
    }

    #[test]
    fn typed_lookups() {
        let globals = GlobalSettings::from(json!({"a": {"n": 5, "s": "v", "bad": "5", "neg": -1}}));
        assert_eq!(globals.lookup_u64(&["a", "n"]).unwrap(), Some(5));
        assert_eq!(globals.lookup_u64(&["a", "missing"]).unwrap(), None);
        assert_eq!(globals.lookup_str(&["a", "s"]).unwrap(), Some("v"));

        let err = globals.lookup_u64(&["a", "bad"]).unwrap_err();
        match err.downcast_ref::<HarnessError>() {
            Some(HarnessError::InvalidGlobal { path, .. }) => assert_eq!(path, "a.bad"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(globals.lookup_u64(&["a", "neg"]).is_err());
        assert!(globals.lookup_str(&["a", "n"]).is_err());
    }

    #[test]
    fn deep_merge() {
        let base = GlobalSettings::from(json!({
            "metrics": {"jmx": {"enabled": true}, "opencensys": {"enabled": false, "port": 1}},
            "ssl": {"enabled": true},
        }));
        let overlay = GlobalSettings::from(json!({
            "metrics": {"opencensys": {"enabled": true}},
            "ssl": false,
        }));
        let merged = base.merge(overlay);
        assert_eq!(
            merged.as_value(),
            &json!({
                "metrics": {"jmx": {"enabled": true}, "opencensys": {"enabled": true, "port": 1}},
                "ssl": false,
            })
        );
    }

    #[test]
    fn read_inline_and_file_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globals.json");
        std::fs::write(&path, r#"{"metrics": {"jmx": {"enabled": true}}}"#).unwrap();

        let sources = vec![
            path.to_string_lossy().into_owned(),
            r#"{"metrics": {"opencensys": {"enabled": true}}}"#.to_string(),
        ];
        let globals = GlobalSettings::read_globals(&sources).unwrap();
        assert!(globals.is_enabled(&["metrics", "jmx", "enabled"]));
        assert!(globals.is_enabled(&["metrics", "opencensys", "enabled"]));

        assert!(GlobalSettings::read_globals(&["{not json"]).is_err());
    }
}
