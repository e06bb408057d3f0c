use actix_web::{web, HttpResponse};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::error::ApiError;
use crate::model::month::{Month, MonthListResponse, MonthPayload};
use crate::utils::pagination::LimitOffset;

#[utoipa::path(
    post,
    path = "/months",
    request_body = MonthPayload,
    responses((status = 201, body = Month)),
    tag = "months"
)]
pub async fn create_month(
    payload: web::Json<MonthPayload>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let mut tx = pool.begin().await?;

    let month = sqlx::query_as::<_, Month>(
        "INSERT INTO month (created_at) VALUES (?) RETURNING id, created_at",
    )
    .bind(payload.created_at)
    .fetch_one(&mut *tx)
    .await?;

    // every existing user gets the new month linked in the same transaction
    let user_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM user")
        .fetch_all(&mut *tx)
        .await?;

    if !user_ids.is_empty() {
        let mut builder =
            QueryBuilder::<Sqlite>::new("INSERT INTO user_month (id_user_fk, id_month_fk) ");
        builder.push_values(&user_ids, |mut row, user_id| {
            row.push_bind(user_id).push_bind(month.id);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    info!(month_id = month.id, users = user_ids.len(), "Month created");

    Ok(HttpResponse::Created().json(month))
}

#[utoipa::path(
    get,
    path = "/months",
    params(LimitOffset),
    responses((status = 200, body = MonthListResponse)),
    tag = "months"
)]
pub async fn read_months(
    query: web::Query<LimitOffset>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let months =
        sqlx::query_as::<_, Month>("SELECT id, created_at FROM month LIMIT ? OFFSET ?")
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(MonthListResponse { months }))
}
