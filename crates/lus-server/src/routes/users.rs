//! User directory routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use lus_db::models::User;
use lus_db::pool::get_conn;
use lus_db::queries::users;

use crate::context::AppContext;
use crate::error::AppError;
use crate::password::{hash_password, verify_password};
use crate::routes::MessageResponse;

/// A user record; the password hash is never exposed.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}

/// Payload for creating a user.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

/// Payload for deleting a user; the account's own password is required.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DeleteUserRequest {
    pub username: String,
    pub password: String,
}

/// POST /users -- create a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created user", body = UserResponse),
        (status = 400, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let hash = hash_password(&payload.password);

    let conn = get_conn(&ctx.db)?;
    let user = users::create_user(&conn, &payload.username, &hash)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users -- list all users.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    )
)]
pub async fn list_users(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let conn = get_conn(&ctx.db)?;
    let users = users::list_users(&conn)?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// DELETE /users -- delete a user after verifying their password.
///
/// Not an administrative override: the wrong password leaves the record
/// intact and returns 403.
#[utoipa::path(
    delete,
    path = "/users",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Password does not match"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let conn = get_conn(&ctx.db)?;

    let user = users::get_user_by_username(&conn, &payload.username)?
        .ok_or_else(|| lus_core::Error::not_found("user", &payload.username))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(lus_core::Error::Forbidden("Incorrect password".into()).into());
    }

    users::delete_user(&conn, user.id)?;

    Ok(Json(MessageResponse::new("User deleted")))
}
