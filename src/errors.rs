//! Error taxonomy.
//!
//! Nothing in this crate recovers from these locally: they are meant to
//! fail the running test scenario, which then proceeds to teardown.
//! Callers can tell them apart via `failure::Error::downcast_ref`.

/// Typed failures of configuration composition and metric extraction.
#[derive(Debug, Fail, PartialEq)]
pub enum HarnessError {
    /// An option was folded into a configuration while disabled in globals.
    #[fail(display = "option '{}' is not enabled in globals", option)]
    ConfigMisuse { option: String },

    /// No management bean matched on a node, or the endpoint is unreachable.
    #[fail(
        display = "no mbean matching '{}' in domain '{}' on node '{}'",
        pattern, domain, node
    )]
    AttributeNotFound {
        node: String,
        pattern: String,
        domain: String,
    },

    /// A resolved bean attribute yielded no value.
    #[fail(display = "attribute '{}' of mbean '{}' has no value", attribute, bean)]
    NoValue { bean: String, attribute: String },

    /// An optional global parameter is present but malformed.
    #[fail(display = "invalid global '{}': {}", path, reason)]
    InvalidGlobal { path: String, reason: String },
}
