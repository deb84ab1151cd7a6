//! Catalog routes: patients, classes, and video listings from Drive.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;

/// One patient derived from a root subfolder.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PatientResponse {
    pub patient_id: String,
    pub display_name: String,
}

/// One playable video sequence.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VideoResponse {
    pub file_name: String,
    /// Relative streaming URL the frontend feeds into its `<video>` element.
    pub url: String,
}

/// GET /api/patients -- list patients from the Drive root folder.
///
/// Drive failures degrade to an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Patients, sorted by folder name", body = [PatientResponse])
    )
)]
pub async fn list_patients(State(ctx): State<AppContext>) -> Json<Vec<PatientResponse>> {
    let patients = ctx.catalog.list_patients().await;
    Json(
        patients
            .into_iter()
            .map(|name| PatientResponse {
                patient_id: name.clone(),
                display_name: name,
            })
            .collect(),
    )
}

/// GET /api/patients/{patient_id}/classes -- list a patient's class folders.
#[utoipa::path(
    get,
    path = "/api/patients/{patient_id}/classes",
    params(("patient_id" = String, Path, description = "Patient folder name")),
    responses(
        (status = 200, description = "Class names in fixed order", body = [String]),
        (status = 404, description = "Unknown patient, or patient with no class folders")
    )
)]
pub async fn list_classes(
    State(ctx): State<AppContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let classes = ctx.catalog.list_classes(&patient_id).await;
    if classes.is_empty() {
        // Unresolvable patient and class-less patient collapse to 404.
        return Err(lus_core::Error::not_found("patient", &patient_id).into());
    }
    Ok(Json(classes))
}

/// GET /api/patients/{patient_id}/classes/{class_id}/videos -- list videos.
///
/// Always 200; an unknown patient/class is indistinguishable from an empty
/// class so the UI can show "no sequences".
#[utoipa::path(
    get,
    path = "/api/patients/{patient_id}/classes/{class_id}/videos",
    params(
        ("patient_id" = String, Path, description = "Patient folder name"),
        ("class_id" = String, Path, description = "Class folder name"),
    ),
    responses(
        (status = 200, description = "Videos sorted by file name", body = [VideoResponse])
    )
)]
pub async fn list_videos(
    State(ctx): State<AppContext>,
    Path((patient_id, class_id)): Path<(String, String)>,
) -> Json<Vec<VideoResponse>> {
    let videos = ctx.catalog.list_videos(&patient_id, &class_id).await;
    Json(
        videos
            .into_iter()
            .map(|v| VideoResponse {
                url: format!("/api/videos/{}", v.file_id),
                file_name: v.file_name,
            })
            .collect(),
    )
}
