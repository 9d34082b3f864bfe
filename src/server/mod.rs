//! HTTP surface: an index page and one multipart feed per camera.

pub mod stream_session;

use crate::core::camera_manager::CameraRegistry;
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, warn};
use std::sync::Arc;
use stream_session::{StreamSession, MULTIPART_CONTENT_TYPE};

#[derive(Clone)]
pub struct ServerState {
    pub registry: Arc<CameraRegistry>,
    pub fps: u32,
    pub jpeg_quality: u8,
}

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed/:display_id", get(video_feed))
        .with_state(state)
}

async fn index(State(state): State<ServerState>) -> Html<String> {
    Html(render_index(&state.registry.display_ids()))
}

pub fn render_index(display_ids: &[u32]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Camera feeds</title></head>\n<body>\n<h1>Camera feeds</h1>\n",
    );
    if display_ids.is_empty() {
        page.push_str("<p>No cameras available.</p>\n");
    }
    for id in display_ids {
        page.push_str(&format!(
            "<div><h2>Camera {id}</h2><img src=\"/video_feed/{id}\" alt=\"Camera {id}\"></div>\n"
        ));
    }
    page.push_str("</body>\n</html>\n");
    page
}

// Ids that do not parse are unknown cameras too, not a rejected request.
async fn video_feed(State(state): State<ServerState>, Path(display_id): Path<String>) -> Response {
    let camera = display_id
        .parse::<u32>()
        .ok()
        .and_then(|id| state.registry.lookup(id));
    let body = match camera {
        Some(camera) => {
            debug!("📡 Client connected to camera {} feed", camera.display_id());
            let session = StreamSession::new(camera.frame_buffer(), state.fps, state.jpeg_quality);
            Body::from_stream(session.into_stream())
        }
        None => {
            warn!("⚠️ Feed requested for unknown camera '{}'", display_id);
            Body::empty()
        }
    };
    ([(header::CONTENT_TYPE, MULTIPART_CONTENT_TYPE)], body).into_response()
}
