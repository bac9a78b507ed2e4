//! Route table and dispatcher for the OMERO.iviewer web application.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{iviewer_routes, RouteMatch, RouteTable, View};
