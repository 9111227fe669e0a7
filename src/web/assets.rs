//! Dashboard files compiled into the binary.

use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed, Clone)]
#[folder = "frontend/"]
pub struct Assets;

const INDEX_HTML: &str = "index.html";

fn serve(path: &str) -> Response {
    match Assets::get(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                Body::from(file.data.into_owned()),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

pub async fn index_handler() -> Response {
    serve(INDEX_HTML)
}

/// Serves `/<asset>` for any embedded file; everything else is a 404.
pub async fn static_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    if path.is_empty() {
        return serve(INDEX_HTML);
    }
    serve(path)
}
