//! Video byte relay from Drive to the client.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use futures::StreamExt;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /api/videos/{file_id} -- stream a video file through the backend.
///
/// The body is produced chunk-by-chunk as the Drive download progresses. A
/// mid-stream failure (client disconnect, transient Drive error) ends the
/// body early instead of erroring; there is no retry and no range support.
#[utoipa::path(
    get,
    path = "/api/videos/{file_id}",
    params(("file_id" = String, Path, description = "Drive file id")),
    responses(
        (status = 200, description = "Video bytes (video/mp4), possibly truncated on transient failure")
    )
)]
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(file_id): Path<String>,
) -> Result<Response, AppError> {
    let chunk_size = ctx.config.drive.stream_chunk_bytes;
    let chunks = lus_drive::stream::stream_file(ctx.drive.clone(), file_id, chunk_size)
        .map(Ok::<_, Infallible>);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .body(Body::from_stream(chunks))
        .map_err(|e| lus_core::Error::Internal(format!("Failed to build response: {e}")).into())
}
