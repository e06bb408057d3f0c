use actix_web::{web, HttpResponse};
use chrono::NaiveDateTime;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::auth::CurrentUser;
use crate::error::ApiError;
use crate::model::income::{IncomeListResponse, IncomePayload, IncomeResponse};
use crate::model::member::MemberResponse;
use crate::utils::pagination::{PageQuery, Pagination};

const INCOME_SELECT: &str = "SELECT i.id, i.name, i.amount, i.id_user_fk, \
     i.created_at, i.updated_at, m.id AS member_id, m.name AS member_name \
     FROM income i LEFT JOIN member m ON m.id = i.id_member_fk";

/// Resolves an optional member reference for a new record. A member owned by
/// someone else reads the same as a missing one, but with a 403.
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
    path = "/incomes",
    request_body = IncomePayload,
    responses(
        (status = 201, body = IncomeResponse),
        (status = 404, description = "Referenced member not found"),
        (status = 403, description = "Referenced member owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "incomes"
)]
pub async fn create_income(
    user: CurrentUser,
    payload: web::Json<IncomePayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    let member = resolve_member(pool.get_ref(), payload.id_member_fk, user.id).await?;

    let (id, created_at, updated_at) = sqlx::query_as::<_, (i64, NaiveDateTime, NaiveDateTime)>(
        "INSERT INTO income (name, amount, id_user_fk, id_member_fk) VALUES (?, ?, ?, ?) \
         RETURNING id, created_at, updated_at",
    )
    .bind(&payload.name)
    .bind(payload.amount.to_string())
    .bind(user.id)
    .bind(payload.id_member_fk)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(IncomeResponse {
        id,
        name: payload.name,
        amount: payload.amount,
        id_user_fk: user.id,
        member,
        created_at,
        updated_at,
    }))
}

#[utoipa::path(
    get,
    path = "/incomes",
    params(PageQuery),
    responses((status = 200, body = IncomeListResponse)),
    security(("bearer_auth" = [])),
    tag = "incomes"
)]
pub async fn read_incomes(
    user: CurrentUser,
    query: web::Query<PageQuery>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();

    let mut count_sql = String::from("SELECT COUNT(id) FROM income WHERE id_user_fk = ?");
    let mut list_sql = format!("{INCOME_SELECT} WHERE i.id_user_fk = ?");

    if query.name_filter().is_some() {
        count_sql.push_str(" AND LOWER(name) LIKE '%' || LOWER(?) || '%'");
        list_sql.push_str(" AND LOWER(i.name) LIKE '%' || LOWER(?) || '%'");
    }
    list_sql.push_str(" ORDER BY i.updated_at DESC LIMIT ? OFFSET ?");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user.id);
    if let Some(name) = query.name_filter() {
        count_query = count_query.bind(name);
    }
    let total = count_query.fetch_one(pool.get_ref()).await?;

    let mut list_query = sqlx::query_as::<_, IncomeResponse>(&list_sql).bind(user.id);
    if let Some(name) = query.name_filter() {
        list_query = list_query.bind(name);
    }
    let items = list_query
        .bind(query.per_page())
        .bind(query.offset())
        .fetch_all(pool.get_ref())
        .await?;

    let pagination = Pagination::new(items.len(), &query, total);

    Ok(HttpResponse::Ok().json(IncomeListResponse { items, pagination }))
}

#[utoipa::path(
    get,
    path = "/incomes/{income_id}",
    params(("income_id", description = "Income ID")),
    responses(
        (status = 200, body = IncomePayload),
        (status = 404, description = "Income not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incomes"
)]
pub async fn get_income(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    // ownership folded into the lookup, a foreign income is a plain 404
    let income = sqlx::query_as::<_, IncomePayload>(
        "SELECT name, amount, id_member_fk FROM income WHERE id = ? AND id_user_fk = ?",
    )
    .bind(path.into_inner())
    .bind(user.id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    Ok(HttpResponse::Ok().json(income))
}

#[utoipa::path(
    put,
    path = "/incomes/{income_id}",
    request_body = IncomePayload,
    params(("income_id", description = "Income ID")),
    responses(
        (status = 200, body = IncomeResponse),
        (status = 404, description = "Income not found"),
        (status = 403, description = "Income owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "incomes"
)]
pub async fn update_income(
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<IncomePayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let income_id = path.into_inner();

    let owner = sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM income WHERE id = ?")
        .bind(income_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to update this income".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE income SET name = ?, amount = ?, id_member_fk = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(payload.amount.to_string())
    .bind(payload.id_member_fk)
    .bind(income_id)
    .execute(pool.get_ref())
    .await?;

    let income = sqlx::query_as::<_, IncomeResponse>(&format!("{INCOME_SELECT} WHERE i.id = ?"))
        .bind(income_id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(income))
}

#[utoipa::path(
    delete,
    path = "/incomes/{income_id}",
    params(("income_id", description = "Income ID")),
    responses(
        (status = 200, description = "Income deleted"),
        (status = 404, description = "Income not found"),
        (status = 403, description = "Income owned by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "incomes"
)]
pub async fn delete_income(
    user: CurrentUser,
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let income_id = path.into_inner();

    let owner = sqlx::query_scalar::<_, i64>("SELECT id_user_fk FROM income WHERE id = ?")
        .bind(income_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to delete this income".to_string(),
        ));
    }

    sqlx::query("DELETE FROM income WHERE id = ?")
        .bind(income_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Income deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{seed_income, seed_member, seed_user, test_app, token_for};
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, read_body_json, TestRequest};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn create_income_with_member() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let member = seed_member(&pool, user, "Ana").await;
        let token = token_for(&config, "alice");

        let req = TestRequest::post()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "test", "amount": 100.0, "id_member_fk": member}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "test");
        assert_eq!(body["amount"], 100.0);
        assert_eq!(body["id_user_fk"], user);
        assert_eq!(body["member"], json!({"id": member, "name": "Ana"}));
        assert!(body["created_at"].is_string());
        assert!(body["updated_at"].is_string());
    }

    #[actix_web::test]
    async fn create_income_without_member() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let token = token_for(&config, "alice");

        let req = TestRequest::post()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "salary", "amount": 2500.5}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["member"], Value::Null);
        assert_eq!(body["amount"], 2500.5);
    }

    #[actix_web::test]
    async fn create_income_with_missing_member_not_found() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let token = token_for(&config, "alice");

        let req = TestRequest::post()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "test", "amount": 100.0, "id_member_fk": 99}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "Member not found"}));
    }

    #[actix_web::test]
    async fn create_income_with_foreign_member_forbidden() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let bob = seed_user(&pool, "bob", "bob@example.com", "secret").await;
        let foreign = seed_member(&pool, bob, "Beto").await;
        let token = token_for(&config, "alice");

        let req = TestRequest::post()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "test", "amount": 100.0, "id_member_fk": foreign}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "Member not found"}));
    }

    #[actix_web::test]
    async fn read_incomes_empty() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "items": [],
                "pagination": {
                    "count": 0,
                    "page": 1,
                    "per_page": 10,
                    "total": 0,
                    "total_pages": 1,
                }
            })
        );
    }

    #[actix_web::test]
    async fn read_incomes_requires_auth() {
        let (app, _pool, _config) = test_app!();

        let req = TestRequest::get().uri("/incomes/").to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "Not authenticated"}));
    }

    #[actix_web::test]
    async fn read_incomes_pages_through() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        for n in 1..=3 {
            seed_income(&pool, user, &format!("income {n}"), "10.0", None).await;
        }
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/?page=2&per_page=2")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["pagination"],
            json!({
                "count": 1,
                "page": 2,
                "per_page": 2,
                "total": 3,
                "total_pages": 2,
            })
        );
    }

    #[actix_web::test]
    async fn read_incomes_past_the_end_is_empty() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        for n in 1..=3 {
            seed_income(&pool, user, &format!("income {n}"), "10.0", None).await;
        }
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/?page=5&per_page=10")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 0);
        assert_eq!(
            body["pagination"],
            json!({
                "count": 0,
                "page": 5,
                "per_page": 10,
                "total": 3,
                "total_pages": 1,
            })
        );
    }

    #[actix_web::test]
    async fn read_incomes_is_caller_scoped() {
        let (app, pool, config) = test_app!();
        let alice = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let bob = seed_user(&pool, "bob", "bob@example.com", "secret").await;
        seed_income(&pool, alice, "mine", "10.0", None).await;
        seed_income(&pool, bob, "theirs", "20.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        let body: Value = read_body_json(resp).await;
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "mine");
    }

    #[actix_web::test]
    async fn read_incomes_filters_by_name() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        seed_income(&pool, user, "Salary", "10.0", None).await;
        seed_income(&pool, user, "salary bonus", "20.0", None).await;
        seed_income(&pool, user, "Dividends", "30.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/?name=SAL")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["total"], 2);

        // Paging applies within the filtered set.
        let req = TestRequest::get()
            .uri("/incomes/?name=SAL&page=2&per_page=1")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        let body: Value = read_body_json(resp).await;
        let name = body["items"][0]["name"].as_str().unwrap().to_lowercase();
        assert!(name.contains("sal"));
        assert_eq!(
            body["pagination"],
            json!({"count": 1, "page": 2, "per_page": 1, "total": 2, "total_pages": 2})
        );
    }

    #[actix_web::test]
    async fn read_incomes_ignores_empty_name_filter() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        seed_income(&pool, user, "Salary", "10.0", None).await;
        seed_income(&pool, user, "Dividends", "30.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/?name=")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn read_incomes_orders_by_most_recently_updated() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let first = seed_income(&pool, user, "older", "10.0", None).await;
        let second = seed_income(&pool, user, "newer", "20.0", None).await;
        sqlx::query("UPDATE income SET updated_at = '2020-01-01 00:00:00' WHERE id = ?")
            .bind(first)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE income SET updated_at = '2030-01-01 00:00:00' WHERE id = ?")
            .bind(second)
            .execute(&pool)
            .await
            .unwrap();
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri("/incomes/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        let body: Value = read_body_json(resp).await;
        let items = body["items"].as_array().unwrap();
        assert_eq!(items[0]["name"], "newer");
        assert_eq!(items[1]["name"], "older");
    }

    #[actix_web::test]
    async fn get_income_returns_slim_shape() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let member = seed_member(&pool, user, "Ana").await;
        let id = seed_income(&pool, user, "test", "100.0", Some(member)).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri(&format!("/incomes/{id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"name": "test", "amount": 100.0, "id_member_fk": member})
        );
    }

    #[actix_web::test]
    async fn get_foreign_income_reads_as_missing() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let bob = seed_user(&pool, "bob", "bob@example.com", "secret").await;
        let foreign = seed_income(&pool, bob, "theirs", "10.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::get()
            .uri(&format!("/incomes/{foreign}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "Income not found"}));
    }

    #[actix_web::test]
    async fn update_income_repoints_member() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let first = seed_member(&pool, user, "Ana").await;
        let second = seed_member(&pool, user, "Bia").await;
        let id = seed_income(&pool, user, "test", "100.0", Some(first)).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::put()
            .uri(&format!("/incomes/{id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "renamed", "amount": 150.0, "id_member_fk": second}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["name"], "renamed");
        assert_eq!(body["amount"], 150.0);
        assert_eq!(body["member"], json!({"id": second, "name": "Bia"}));
    }

    #[actix_web::test]
    async fn update_income_can_clear_member() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let member = seed_member(&pool, user, "Ana").await;
        let id = seed_income(&pool, user, "test", "100.0", Some(member)).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::put()
            .uri(&format!("/incomes/{id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "test", "amount": 100.0, "id_member_fk": null}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["member"], Value::Null);
    }

    #[actix_web::test]
    async fn update_missing_income_not_found() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let token = token_for(&config, "alice");

        let req = TestRequest::put()
            .uri("/incomes/99")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "test", "amount": 100.0}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "Income not found"}));
    }

    #[actix_web::test]
    async fn update_foreign_income_forbidden() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let bob = seed_user(&pool, "bob", "bob@example.com", "secret").await;
        let foreign = seed_income(&pool, bob, "theirs", "10.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::put()
            .uri(&format!("/incomes/{foreign}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "hijack", "amount": 1.0}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"detail": "You don't have permission to update this income"})
        );
    }

    #[actix_web::test]
    async fn delete_income() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let id = seed_income(&pool, user, "test", "100.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::delete()
            .uri(&format!("/incomes/{id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"message": "Income deleted successfully"}));

        let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM income")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[actix_web::test]
    async fn delete_foreign_income_forbidden() {
        let (app, pool, config) = test_app!();
        seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let bob = seed_user(&pool, "bob", "bob@example.com", "secret").await;
        let foreign = seed_income(&pool, bob, "theirs", "10.0", None).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::delete()
            .uri(&format!("/incomes/{foreign}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"detail": "You don't have permission to delete this income"})
        );
    }

    #[actix_web::test]
    async fn deleting_member_clears_income_reference() {
        let (app, pool, config) = test_app!();
        let user = seed_user(&pool, "alice", "alice@example.com", "secret").await;
        let member = seed_member(&pool, user, "Ana").await;
        let id = seed_income(&pool, user, "test", "100.0", Some(member)).await;
        let token = token_for(&config, "alice");

        let req = TestRequest::delete()
            .uri(&format!("/members/{member}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri(&format!("/incomes/{id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["id_member_fk"], Value::Null);
    }
}
