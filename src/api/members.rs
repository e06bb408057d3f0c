use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::auth::CurrentUser;
use crate::error::ApiError;
use crate::model::member::{MemberListResponse, MemberPayload, MemberResponse};
use crate::utils::pagination::LimitOffset;

#[utoipa::path(
    post,
    path = "/members",
    request_body = MemberPayload,
    responses((status = 201, body = MemberResponse)),
    security(("bearer_auth" = [])),
    tag = "members"
)]
pub async fn create_member(
    user: CurrentUser,
    payload: web::Json<MemberPayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let member = sqlx::query_as::<_, MemberResponse>(
        "INSERT INTO member (name, id_user_fk) VALUES (?, ?) RETURNING id, name",
    )
    .bind(&payload.name)
    .bind(user.id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(member))
}

/// Unauthenticated listing across all users, kept for the lightweight
/// household setup flow.
#[utoipa::path(
    get,
    path = "/members",
    params(LimitOffset),
    responses((status = 200, body = MemberListResponse)),
    tag = "members"
)]
pub async fn read_members(
    query: web::Query<LimitOffset>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let members =
        sqlx::query_as::<_, MemberResponse>("SELECT id, name FROM member LIMIT ? OFFSET ?")
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(MemberListResponse { members }))
}

#[utoipa::path(
    get,
    path = "/members/list",
    responses((status = 200, body = MemberListResponse)),
    security(("bearer_auth" = [])),
    tag = "members"
)]
pub async fn read_members_list(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let members =
        sqlx::query_as::<_, MemberResponse>("SELECT id, name FROM member WHERE id_user_fk = ?")
            .bind(user.id)
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(MemberListResponse { members }))
}

#[utoipa::path(
    put,
    path = "/members/{member_id}",
    request_body = MemberPayload,
    params(("member_id", description = "Member ID")),
    responses(
        (status = 200, body = MemberResponse),
        (status = 404, description = "Member not found"),
        (status = 403, description = "Member owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "members"
)]
pub async fn update_member(
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<MemberPayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let member_id = path.into_inner();

    let owner = sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM member WHERE id = ?")
        .bind(member_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to update this member".to_string(),
        ));
    }

    let member = sqlx::query_as::<_, MemberResponse>(
        "UPDATE member SET name = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? \
         RETURNING id, name",
    )
    .bind(&payload.name)
    .bind(member_id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(member))
}

#[utoipa::path(
    delete,
    path = "/members/{member_id}",
    params(("member_id", description = "Member ID")),
    responses(
        (status = 200, description = "Member deleted"),
        (status = 404, description = "Member not found"),
        (status = 403, description = "Member owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "members"
)]
pub async fn delete_member(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let member_id = path.into_inner();

    let owner = sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM member WHERE id = ?")
        .bind(member_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to delete this member".to_string(),
        ));
    }

    sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(member_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Member deleted successfully"})))
}
