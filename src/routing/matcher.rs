//! Route matching logic.
//!
//! # Responsibilities
//! - Compile a route's regular expression once, at startup
//! - Match a path (relative to the mount prefix) against it
//! - Extract named capture groups as string parameters
//!
//! # Design Decisions
//! - Patterns are used exactly as declared; anchoring is part of the pattern
//! - Only named groups become parameters; unnamed groups are ignored
//! - An optional group that did not participate is recorded as `None`
//! - Path matching is case-sensitive

use regex::Regex;

use crate::routing::reverse::Template;
use crate::routing::types::{Params, PatternError, ReverseError};

/// Trait for matching request paths against a route condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured parameters if the path matches.
    fn captures(&self, path: &str) -> Option<Params>;

    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }
}

/// A compiled path pattern with its reverse template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    param_names: Vec<String>,
    template: Template,
}

impl RoutePattern {
    /// Compile a pattern source.
    pub fn new(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();
        let regex = Regex::new(&source)?;
        let param_names = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();
        let template = Template::parse(&source)?;

        Ok(Self {
            source,
            regex,
            param_names,
            template,
        })
    }

    /// The pattern as declared.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Named capture groups in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Render a relative path for this pattern.
    pub fn reverse(&self, params: &[(&str, &str)]) -> Result<String, ReverseError> {
        self.template.render(params)
    }
}

impl Matcher for RoutePattern {
    fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .map(|name| {
                    let value = caps.name(name).map(|m| m.as_str().to_string());
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}
