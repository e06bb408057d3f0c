use actix_web::{web, HttpResponse};
use chrono::NaiveDateTime;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::auth::CurrentUser;
use crate::error::ApiError;
use crate::model::essential_expense::{
    EssentialExpenseListResponse, EssentialExpensePayload, EssentialExpenseResponse,
};
use crate::model::member::MemberResponse;
use crate::utils::pagination::{PageQuery, Pagination};

const EXPENSE_SELECT: &str = "SELECT e.id, e.name, e.expected, e.id_user_fk, \
     e.created_at, e.updated_at, m.id AS member_id, m.name AS member_name \
     FROM essential_expense e LEFT JOIN member m ON m.id = e.id_member_fk";

async fn resolve_member(
    pool: &SqlitePool,
    member_id: Option<i64>,
    user_id: i64,
) -> Result<Option<MemberResponse>, ApiError> {
    let Some(member_id) = member_id else {
        return Ok(None);
    };

    let (id, name, owner) = sqlx::query_as::<_, (i64, String, i64)>(
        "SELECT id, name, id_user_fk FROM member WHERE id = ?",
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    if owner != user_id {
        return Err(ApiError::Forbidden("Member not found".to_string()));
    }

    Ok(Some(MemberResponse { id, name }))
}

#[utoipa::path(
    post,
    path = "/essential-expenses",
    request_body = EssentialExpensePayload,
    responses(
        (status = 201, body = EssentialExpenseResponse),
        (status = 404, description = "Referenced member not found"),
        (status = 403, description = "Referenced member owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "essential expenses"
)]
pub async fn create_essential_expense(
    user: CurrentUser,
    payload: web::Json<EssentialExpensePayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    let member = resolve_member(pool.get_ref(), payload.id_member_fk, user.id).await?;

    let (id, created_at, updated_at) = sqlx::query_as::<_, (i64, NaiveDateTime, NaiveDateTime)>(
        "INSERT INTO essential_expense (name, expected, id_user_fk, id_member_fk) \
         VALUES (?, ?, ?, ?) RETURNING id, created_at, updated_at",
    )
    .bind(&payload.name)
    .bind(payload.expected.to_string())
    .bind(user.id)
    .bind(payload.id_member_fk)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(EssentialExpenseResponse {
        id,
        name: payload.name,
        expected: payload.expected,
        id_user_fk: user.id,
        member,
        created_at,
        updated_at,
    }))
}

#[utoipa::path(
    get,
    path = "/essential-expenses",
    params(PageQuery),
    responses((status = 200, body = EssentialExpenseListResponse)),
    security(("bearer_auth" = [])),
    tag = "essential expenses"
)]
pub async fn read_essential_expenses(
    user: CurrentUser,
    query: web::Query<PageQuery>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();

    let mut count_sql =
        String::from("SELECT COUNT(id) FROM essential_expense WHERE id_user_fk = ?");
    let mut list_sql = format!("{EXPENSE_SELECT} WHERE e.id_user_fk = ?");

    if query.name_filter().is_some() {
        count_sql.push_str(" AND LOWER(name) LIKE '%' || LOWER(?) || '%'");
        list_sql.push_str(" AND LOWER(e.name) LIKE '%' || LOWER(?) || '%'");
    }
    list_sql.push_str(" ORDER BY e.updated_at DESC LIMIT ? OFFSET ?");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user.id);
    if let Some(name) = query.name_filter() {
        count_query = count_query.bind(name);
    }
    let total = count_query.fetch_one(pool.get_ref()).await?;

    let mut list_query = sqlx::query_as::<_, EssentialExpenseResponse>(&list_sql).bind(user.id);
    if let Some(name) = query.name_filter() {
        list_query = list_query.bind(name);
    }
    let items = list_query
        .bind(query.per_page())
        .bind(query.offset())
        .fetch_all(pool.get_ref())
        .await?;

    let pagination = Pagination::new(items.len(), &query, total);

    Ok(HttpResponse::Ok().json(EssentialExpenseListResponse { items, pagination }))
}

#[utoipa::path(
    get,
    path = "/essential-expenses/{expense_id}",
    params(("expense_id", description = "Essential expense ID")),
    responses(
        (status = 200, body = EssentialExpensePayload),
        (status = 404, description = "Essential expense not found")
    ),
    security(("bearer_auth" = [])),
    tag = "essential expenses"
)]
pub async fn get_essential_expense(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let expense = sqlx::query_as::<_, EssentialExpensePayload>(
        "SELECT name, expected, id_member_fk FROM essential_expense \
         WHERE id = ? AND id_user_fk = ?",
    )
    .bind(path.into_inner())
    .bind(user.id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("Essential expense not found".to_string()))?;

    Ok(HttpResponse::Ok().json(expense))
}

#[utoipa::path(
    put,
    path = "/essential-expenses/{expense_id}",
    request_body = EssentialExpensePayload,
    params(("expense_id", description = "Essential expense ID")),
    responses(
        (status = 200, body = EssentialExpenseResponse),
        (status = 404, description = "Essential expense not found"),
        (status = 403, description = "Essential expense owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "essential expenses"
)]
pub async fn update_essential_expense(
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<EssentialExpensePayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let expense_id = path.into_inner();

    let owner =
        sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM essential_expense WHERE id = ?")
            .bind(expense_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Essential expense not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to update this essential expense".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE essential_expense SET name = ?, expected = ?, id_member_fk = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(payload.expected.to_string())
    .bind(payload.id_member_fk)
    .bind(expense_id)
    .execute(pool.get_ref())
    .await?;

    let expense = sqlx::query_as::<_, EssentialExpenseResponse>(&format!(
        "{EXPENSE_SELECT} WHERE e.id = ?"
    ))
    .bind(expense_id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(expense))
}

#[utoipa::path(
    delete,
    path = "/essential-expenses/{expense_id}",
    params(("expense_id", description = "Essential expense ID")),
    responses(
        (status = 200, description = "Essential expense deleted"),
        (status = 404, description = "Essential expense not found"),
        (status = 403, description = "Essential expense owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "essential expenses"
)]
pub async fn delete_essential_expense(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let expense_id = path.into_inner();

    let owner =
        sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM essential_expense WHERE id = ?")
            .bind(expense_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Essential expense not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to delete this essential expense".to_string(),
        ));
    }

    sqlx::query("DELETE FROM essential_expense WHERE id = ?")
        .bind(expense_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Essential expense deleted successfully"})))
}
