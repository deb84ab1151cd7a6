//! Axum router construction.
//!
//! Builds the full application router with all route groups, permissive CORS
//! (the tool runs next to a dev frontend), request tracing, and the OpenAPI
//! document.

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::catalog::list_patients,
        routes::catalog::list_classes,
        routes::catalog::list_videos,
        routes::videos::stream_video,
        routes::history::list_history,
        routes::history::add_history,
        routes::history::delete_history,
        routes::users::create_user,
        routes::users::list_users,
        routes::users::delete_user,
        routes::auth::login,
        routes::auth::change_password,
    ),
    components(schemas(
        routes::MessageResponse,
        routes::health::HealthResponse,
        routes::catalog::PatientResponse,
        routes::catalog::VideoResponse,
        routes::history::HistoryEntryResponse,
        routes::history::HistoryEntryRequest,
        routes::history::HistoryDeleteResponse,
        routes::users::UserResponse,
        routes::users::CreateUserRequest,
        routes::users::DeleteUserRequest,
        routes::auth::LoginRequest,
        routes::auth::ChangePasswordRequest,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        // Drive-backed catalog
        .route("/api/patients", get(routes::catalog::list_patients))
        .route(
            "/api/patients/{patient_id}/classes",
            get(routes::catalog::list_classes),
        )
        .route(
            "/api/patients/{patient_id}/classes/{class_id}/videos",
            get(routes::catalog::list_videos),
        )
        .route("/api/videos/{file_id}", get(routes::videos::stream_video))
        // Correction history
        .route(
            "/history",
            get(routes::history::list_history).post(routes::history::add_history),
        )
        .route("/history/{id}", delete(routes::history::delete_history))
        // User directory
        .route(
            "/users",
            get(routes::users::list_users)
                .post(routes::users::create_user)
                .delete(routes::users::delete_user),
        )
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route(
            "/auth/change-password",
            post(routes::auth::change_password),
        )
        // OpenAPI document
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
