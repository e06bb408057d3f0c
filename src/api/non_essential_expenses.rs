use actix_web::{web, HttpResponse};
use chrono::NaiveDateTime;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::auth::CurrentUser;
use crate::error::ApiError;
use crate::model::member::MemberResponse;
use crate::model::non_essential_expense::{
    NonEssentialExpenseListResponse, NonEssentialExpensePayload, NonEssentialExpenseResponse,
};
use crate::utils::pagination::{PageQuery, Pagination};

const EXPENSE_SELECT: &str = "SELECT e.id, e.name, e.expected, e.id_user_fk, \
     e.created_at, e.updated_at, m.id AS member_id, m.name AS member_name \
     FROM non_essential_expense e LEFT JOIN member m ON m.id = e.id_member_fk";

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
    path = "/non-essential-expenses",
    request_body = NonEssentialExpensePayload,
    responses(
        (status = 201, body = NonEssentialExpenseResponse),
        (status = 404, description = "Referenced member not found"),
        (status = 403, description = "Referenced member owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "non essential expenses"
)]
pub async fn create_non_essential_expense(
    user: CurrentUser,
    payload: web::Json<NonEssentialExpensePayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    let member = resolve_member(pool.get_ref(), payload.id_member_fk, user.id).await?;

    let (id, created_at, updated_at) = sqlx::query_as::<_, (i64, NaiveDateTime, NaiveDateTime)>(
        "INSERT INTO non_essential_expense (name, expected, id_user_fk, id_member_fk) \
         VALUES (?, ?, ?, ?) RETURNING id, created_at, updated_at",
    )
    .bind(&payload.name)
    .bind(payload.expected.to_string())
    .bind(user.id)
    .bind(payload.id_member_fk)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(NonEssentialExpenseResponse {
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
    path = "/non-essential-expenses",
    params(PageQuery),
    responses((status = 200, body = NonEssentialExpenseListResponse)),
    security(("bearer_auth" = [])),
    tag = "non essential expenses"
)]
pub async fn read_non_essential_expenses(
    user: CurrentUser,
    query: web::Query<PageQuery>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();

    let mut count_sql =
        String::from("SELECT COUNT(id) FROM non_essential_expense WHERE id_user_fk = ?");
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

    let mut list_query =
        sqlx::query_as::<_, NonEssentialExpenseResponse>(&list_sql).bind(user.id);
    if let Some(name) = query.name_filter() {
        list_query = list_query.bind(name);
    }
    let items = list_query
        .bind(query.per_page())
        .bind(query.offset())
        .fetch_all(pool.get_ref())
        .await?;

    let pagination = Pagination::new(items.len(), &query, total);

    Ok(HttpResponse::Ok().json(NonEssentialExpenseListResponse { items, pagination }))
}

#[utoipa::path(
    get,
    path = "/non-essential-expenses/{expense_id}",
    params(("expense_id", description = "Non-essential expense ID")),
    responses(
        (status = 200, body = NonEssentialExpensePayload),
        (status = 404, description = "Non-essential expense not found")
    ),
    security(("bearer_auth" = [])),
    tag = "non essential expenses"
)]
pub async fn get_non_essential_expense(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let expense = sqlx::query_as::<_, NonEssentialExpensePayload>(
        "SELECT name, expected, id_member_fk FROM non_essential_expense \
         WHERE id = ? AND id_user_fk = ?",
    )
    .bind(path.into_inner())
    .bind(user.id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("Non essential expense not found".to_string()))?;

    Ok(HttpResponse::Ok().json(expense))
}

#[utoipa::path(
    put,
    path = "/non-essential-expenses/{expense_id}",
    request_body = NonEssentialExpensePayload,
    params(("expense_id", description = "Non-essential expense ID")),
    responses(
        (status = 200, body = NonEssentialExpenseResponse),
        (status = 404, description = "Non-essential expense not found"),
        (status = 403, description = "Non-essential expense owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "non essential expenses"
)]
pub async fn update_non_essential_expense(
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<NonEssentialExpensePayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let expense_id = path.into_inner();

    // the update path spells its not-found detail differently, kept as is
    let owner =
        sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM non_essential_expense WHERE id = ?")
            .bind(expense_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Non Essential expense not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to update this non essential expense".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE non_essential_expense SET name = ?, expected = ?, id_member_fk = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(payload.expected.to_string())
    .bind(payload.id_member_fk)
    .bind(expense_id)
    .execute(pool.get_ref())
    .await?;

    let expense = sqlx::query_as::<_, NonEssentialExpenseResponse>(&format!(
        "{EXPENSE_SELECT} WHERE e.id = ?"
    ))
    .bind(expense_id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(expense))
}

#[utoipa::path(
    delete,
    path = "/non-essential-expenses/{expense_id}",
    params(("expense_id", description = "Non-essential expense ID")),
    responses(
        (status = 200, description = "Non-essential expense deleted"),
        (status = 404, description = "Non-essential expense not found"),
        (status = 403, description = "Non-essential expense owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "non essential expenses"
)]
pub async fn delete_non_essential_expense(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let expense_id = path.into_inner();

    let owner =
        sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM non_essential_expense WHERE id = ?")
            .bind(expense_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Non essential expense not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to delete this non essential expense".to_string(),
        ));
    }

    sqlx::query("DELETE FROM non_essential_expense WHERE id = ?")
        .bind(expense_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Non essential expense deleted successfully"})))
}
