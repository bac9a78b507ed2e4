//! Shared routing types and error definitions.

use std::collections::BTreeMap;
use thiserror::Error;

/// Captured path parameters keyed by capture-group name.
///
/// Optional groups that did not take part in the match are present with a
/// `None` value, so handlers can tell "absent" apart from "unknown name".
pub type Params = BTreeMap<String, Option<String>>;

/// Errors raised while compiling a single path pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern is not a valid regular expression.
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    /// The pattern uses syntax that cannot be turned back into a URL.
    #[error("pattern is not reversible: {0}")]
    Irreversible(String),
}

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A route pattern failed to compile.
    #[error("route '{route}': {source}")]
    Pattern {
        route: String,
        #[source]
        source: PatternError,
    },

    /// Two routes share the same name.
    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    /// Mount prefix must start and end with '/'.
    #[error("invalid mount prefix '{0}': must start and end with '/'")]
    InvalidMountPrefix(String),
}

/// Errors raised while generating a URL from a route name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReverseError {
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    #[error("missing required parameter '{0}'")]
    MissingParam(String),

    /// Only part of an optional group's parameters were given.
    #[error("optional group needs parameter '{0}' as well")]
    IncompleteOptionalGroup(String),

    #[error("value '{value}' does not match the pattern of parameter '{name}'")]
    InvalidValue { name: String, value: String },

    #[error("route does not take parameter '{0}'")]
    UnexpectedParam(String),
}
