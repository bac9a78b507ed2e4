//! View handler seam.
//!
//! The views behind the routes (image metadata, ROI statistics, intensity
//! sampling, pagination) live outside this crate. The dispatcher only knows
//! them through `ViewHandler`.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
    Json,
};

use crate::routing::{RouteMatch, View};

/// Something that can answer a resolved request.
#[async_trait]
pub trait ViewHandler: Send + Sync {
    /// Handle a request already matched to a route.
    async fn handle(&self, matched: RouteMatch<View>, request: Request<Body>) -> Response;
}

/// Default handler: answers with the resolution itself as JSON.
///
/// ```json
/// {"route": "omero_iviewer_image_data", "view": "image_data", "params": {"image_id": "5"}}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl ViewHandler for EchoHandler {
    async fn handle(&self, matched: RouteMatch<View>, _request: Request<Body>) -> Response {
        Json(matched).into_response()
    }
}
