//! Correction-history routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use lus_db::models::HistoryEntry;
use lus_db::pool::get_conn;
use lus_db::queries::history;

use crate::context::AppContext;
use crate::error::AppError;

/// A recorded label correction.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HistoryEntryResponse {
    pub id: i64,
    pub patient_id: String,
    pub sequence_id: String,
    pub previous_label: String,
    pub updated_label: String,
    pub annotator: String,
    pub timestamp: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(e: HistoryEntry) -> Self {
        Self {
            id: e.id,
            patient_id: e.patient_id,
            sequence_id: e.sequence_id,
            previous_label: e.previous_label,
            updated_label: e.updated_label,
            annotator: e.annotator,
            timestamp: e.timestamp,
        }
    }
}

/// Payload for recording a correction.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct HistoryEntryRequest {
    pub patient_id: String,
    pub sequence_id: String,
    pub previous_label: String,
    pub updated_label: String,
    pub annotator: String,
}

/// Query string for listing history.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct HistoryQuery {
    /// Only entries by this annotator; empty means no filter.
    pub annotator: Option<String>,
}

/// Deletion acknowledgement.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HistoryDeleteResponse {
    pub ok: bool,
}

/// GET /history -- list entries, newest first.
#[utoipa::path(
    get,
    path = "/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Entries, newest first", body = [HistoryEntryResponse])
    )
)]
pub async fn list_history(
    State(ctx): State<AppContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntryResponse>>, AppError> {
    let annotator = query.annotator.as_deref().filter(|a| !a.is_empty());

    let conn = get_conn(&ctx.db)?;
    let entries = history::list_history(&conn, annotator)?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /history -- record a correction.
///
/// One row per (patient, sequence) pair: a repeat post for the same pair
/// updates that row in place and refreshes its timestamp.
#[utoipa::path(
    post,
    path = "/history",
    request_body = HistoryEntryRequest,
    responses(
        (status = 201, description = "The created or updated entry", body = HistoryEntryResponse)
    )
)]
pub async fn add_history(
    State(ctx): State<AppContext>,
    Json(payload): Json<HistoryEntryRequest>,
) -> Result<(StatusCode, Json<HistoryEntryResponse>), AppError> {
    let conn = get_conn(&ctx.db)?;
    let entry = history::upsert_history(
        &conn,
        &payload.patient_id,
        &payload.sequence_id,
        &payload.previous_label,
        &payload.updated_label,
        &payload.annotator,
    )?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// DELETE /history/{id} -- delete an entry by id.
#[utoipa::path(
    delete,
    path = "/history/{id}",
    params(("id" = i64, Path, description = "History entry id")),
    responses(
        (status = 200, description = "Deleted", body = HistoryDeleteResponse),
        (status = 404, description = "No such entry")
    )
)]
pub async fn delete_history(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<HistoryDeleteResponse>, AppError> {
    let conn = get_conn(&ctx.db)?;
    if !history::delete_history(&conn, id)? {
        return Err(lus_core::Error::not_found("history entry", id).into());
    }
    Ok(Json(HistoryDeleteResponse { ok: true }))
}
