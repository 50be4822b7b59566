//! Embedded API documentation.
//!
//! The Redoc page and the OpenAPI document live in `assets/` and are compiled
//! into the binary.

use rust_embed::RustEmbed;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
struct ApiAssets;

pub const REDOC_PAGE: &str = "index.html";
pub const OPENAPI_DOCUMENT: &str = "openapi.yaml";

/// Serves one embedded asset with a content type guessed from its name.
pub fn serve_asset(name: &str) -> Response {
    match ApiAssets::get(name) {
        Some(file) => {
            let mime = mime_guess::from_path(name).first_or_octet_stream();
            reply::with_header(file.data.into_owned(), "Content-Type", mime.to_string())
                .into_response()
        }
        None => reply::with_status(
            reply::json(&super::types::ApiError::new("Documentation not found")),
            StatusCode::NOT_FOUND,
        )
        .into_response(),
    }
}
