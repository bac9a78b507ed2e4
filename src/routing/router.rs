//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the matching route for a request path
//! - Generate URLs from route names (reverse lookup)
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins; declaration order is the only priority
//! - O(n) pattern scan (acceptable for typical route counts)
//! - O(1) name lookup via HashMap for reverse lookup
//! - Explicit `None` rather than a silent default route

use std::collections::HashMap;

use serde::Serialize;

use crate::routing::matcher::{Matcher, RoutePattern};
use crate::routing::types::{Params, ReverseError, RouteError};

/// A single compiled route.
#[derive(Debug, Clone)]
pub struct Route<H> {
    name: String,
    pattern: RoutePattern,
    handler: H,
}

impl<H> Route<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch<H> {
    /// Name of the matched route.
    #[serde(rename = "route")]
    pub name: String,

    /// Handler bound to the route.
    #[serde(rename = "view")]
    pub handler: H,

    /// Captured parameters.
    pub params: Params,
}

/// Builder collecting route declarations before compilation.
#[derive(Debug)]
pub struct RouteTableBuilder<H> {
    mount_prefix: String,
    entries: Vec<(String, H, String)>,
}

impl<H> RouteTableBuilder<H> {
    /// Set the URL prefix all routes live under (default `/`).
    pub fn mount(mut self, prefix: impl Into<String>) -> Self {
        self.mount_prefix = prefix.into();
        self
    }

    /// Declare a route. Order of declaration is match order.
    pub fn route(mut self, pattern: impl Into<String>, handler: H, name: impl Into<String>) -> Self {
        self.entries.push((pattern.into(), handler, name.into()));
        self
    }

    /// Compile all declared routes into an immutable table.
    pub fn build(self) -> Result<RouteTable<H>, RouteError> {
        if !self.mount_prefix.starts_with('/') || !self.mount_prefix.ends_with('/') {
            return Err(RouteError::InvalidMountPrefix(self.mount_prefix));
        }

        let mut routes = Vec::with_capacity(self.entries.len());
        let mut by_name = HashMap::with_capacity(self.entries.len());

        for (pattern, handler, name) in self.entries {
            if by_name.contains_key(&name) {
                return Err(RouteError::DuplicateName(name));
            }
            let pattern = RoutePattern::new(pattern).map_err(|source| RouteError::Pattern {
                route: name.clone(),
                source,
            })?;
            by_name.insert(name.clone(), routes.len());
            routes.push(Route {
                name,
                pattern,
                handler,
            });
        }

        tracing::debug!(
            routes = routes.len(),
            mount_prefix = %self.mount_prefix,
            "Route table compiled"
        );

        Ok(RouteTable {
            mount_prefix: self.mount_prefix,
            routes,
            by_name,
        })
    }
}

/// Ordered, immutable table of routes.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    mount_prefix: String,
    routes: Vec<Route<H>>,
    by_name: HashMap<String, usize>,
}

impl<H> RouteTable<H> {
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder {
            mount_prefix: "/".to_string(),
            entries: Vec::new(),
        }
    }

    pub fn mount_prefix(&self) -> &str {
        &self.mount_prefix
    }

    /// All routes in match order.
    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    pub fn get(&self, name: &str) -> Option<&Route<H>> {
        self.by_name.get(name).map(|&i| &self.routes[i])
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Strip the mount prefix from an absolute request path.
    ///
    /// The prefix without its trailing slash addresses the mount root.
    pub fn relative_path<'p>(&self, path: &'p str) -> Option<&'p str> {
        if let Some(rest) = path.strip_prefix(self.mount_prefix.as_str()) {
            return Some(rest);
        }
        if path == self.mount_prefix.trim_end_matches('/') {
            return Some("");
        }
        None
    }

    /// Find the first route matching an absolute request path.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<H>>
    where
        H: Clone,
    {
        let relative = self.relative_path(path)?;
        self.routes.iter().find_map(|route| {
            route.pattern.captures(relative).map(|params| RouteMatch {
                name: route.name.clone(),
                handler: route.handler.clone(),
                params,
            })
        })
    }

    /// Build the absolute URL for a named route.
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, ReverseError> {
        let route = self
            .get(name)
            .ok_or_else(|| ReverseError::UnknownRoute(name.to_string()))?;
        let relative = route.pattern.reverse(params)?;
        Ok(format!("{}{}", self.mount_prefix, relative))
    }
}
