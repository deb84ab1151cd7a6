//! Authentication routes: login and password change.
//!
//! There is no session or token model; login is a one-shot password check
//! the frontend performs before letting an annotator in.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use lus_db::pool::get_conn;
use lus_db::queries::users;

use crate::context::AppContext;
use crate::error::AppError;
use crate::password::{hash_password, verify_password};
use crate::routes::MessageResponse;

/// Login payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Password change payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

/// POST /auth/login -- check username + password.
///
/// An unknown username and a wrong password produce the identical response,
/// so the endpoint cannot be used to enumerate usernames.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials are valid", body = MessageResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let conn = get_conn(&ctx.db)?;

    let valid = users::get_user_by_username(&conn, &payload.username)?
        .map(|u| verify_password(&payload.password, &u.password_hash))
        .unwrap_or(false);

    if !valid {
        return Err(lus_core::Error::Unauthorized("Invalid username or password".into()).into());
    }

    Ok(Json(MessageResponse::new("ok")))
}

/// POST /auth/change-password -- change a user's password.
#[utoipa::path(
    post,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Old password is incorrect"),
        (status = 404, description = "No such user")
    )
)]
pub async fn change_password(
    State(ctx): State<AppContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let conn = get_conn(&ctx.db)?;

    let user = users::get_user_by_username(&conn, &payload.username)?
        .ok_or_else(|| lus_core::Error::not_found("user", &payload.username))?;

    if !verify_password(&payload.old_password, &user.password_hash) {
        return Err(lus_core::Error::Validation("Old password is incorrect".into()).into());
    }

    users::update_password(&conn, user.id, &hash_password(&payload.new_password))?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
