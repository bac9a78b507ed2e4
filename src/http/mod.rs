//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → server.rs dispatch (route table lookup, 404 on no match)
//!     → handler.rs (ViewHandler answers the matched request)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod server;

pub use handler::{EchoHandler, ViewHandler};
pub use request::{RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
