use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::auth::auth::CurrentUser;
use crate::auth::password::hash_password;
use crate::error::{is_unique_violation, ApiError};
use crate::model::user::{UserListResponse, UserPayload, UserResponse};
use crate::utils::pagination::LimitOffset;

#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, body = UserResponse),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "users"
)]
#[instrument(name = "create_user", skip(payload, pool), fields(username = %payload.username))]
pub async fn create_user(
    payload: web::Json<UserPayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let existing = sqlx::query_as::<_, (String, String)>(
        "SELECT username, email FROM user WHERE username = ? OR email = ?",
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .fetch_optional(pool.get_ref())
    .await?;

    if let Some((username, _)) = existing {
        let detail = if username == payload.username {
            "Username already exists"
        } else {
            "Email already exists"
        };
        return Err(ApiError::Conflict(detail.to_string()));
    }

    let hashed = hash_password(&payload.password);

    // A registration racing past the pre-check still lands here.
    let user = sqlx::query_as::<_, UserResponse>(
        "INSERT INTO user (name, username, email, password) VALUES (?, ?, ?, ?) \
         RETURNING id, name, username, email",
    )
    .bind(&payload.name)
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Username or email already exists".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    info!(user_id = user.id, "User registered");

    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    get,
    path = "/users",
    params(LimitOffset),
    responses((status = 200, body = UserListResponse)),
    tag = "users"
)]
pub async fn read_users(
    query: web::Query<LimitOffset>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let users = sqlx::query_as::<_, UserResponse>(
        "SELECT id, name, username, email FROM user LIMIT ? OFFSET ?",
    )
    .bind(query.limit())
    .bind(query.offset())
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(UserListResponse { users }))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    request_body = UserPayload,
    params(("user_id", description = "User ID")),
    responses(
        (status = 200, body = UserResponse),
        (status = 403, description = "Editing another user"),
        (status = 409, description = "Username or email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UserPayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    if user_id != user.id {
        return Err(ApiError::Forbidden("Not enough permissions".to_string()));
    }

    let hashed = hash_password(&payload.password);

    let updated = sqlx::query_as::<_, UserResponse>(
        "UPDATE user SET name = ?, username = ?, email = ?, password = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ? \
         RETURNING id, name, username, email",
    )
    .bind(&payload.name)
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed)
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Username or email already exists".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    Ok(HttpResponse::Ok().json(updated))
}
