//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (strip mount prefix, route lookup)
//!     → matcher.rs (evaluate patterns, capture named groups)
//!     → Return: RouteMatch or None
//!
//! Route Compilation (at startup):
//!     table.rs declarations (pattern, view, name)
//!     → Compile regexes and reverse templates
//!     → Reject duplicate names
//!     → Freeze as immutable RouteTable
//!
//! Reverse lookup:
//!     route name + params → reverse.rs → URL
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - First match wins (declaration order)
//! - Captures stay strings; params.rs coerces on demand

pub mod matcher;
pub mod params;
pub mod reverse;
pub mod router;
pub mod table;
pub mod types;

pub use params::{ObjectType, ParamError, PlaneRange, UnknownObjectType};
pub use router::{Route, RouteMatch, RouteTable};
pub use table::{iviewer_routes, View};
pub use types::{Params, PatternError, ReverseError, RouteError};
