use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::user::User;
use crate::models::{LoginRequest, TokenResponse};

#[utoipa::path(
    post,
    path = "/auth/token",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    ),
    tag = "auth"
)]
#[instrument(name = "auth_login", skip(form, pool, config), fields(username = %form.username))]
pub async fn login(
    form: web::Form<LoginRequest>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    debug!("Fetching user from database");

    let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE username = ?")
        .bind(&form.username)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| {
            info!("Login rejected: unknown username");
            ApiError::Unauthorized("Incorrect username or password".to_string())
        })?;

    if verify_password(&form.password, &user.password).is_err() {
        info!("Login rejected: password mismatch");
        return Err(ApiError::Unauthorized(
            "Incorrect username or password".to_string(),
        ));
    }

    let access_token =
        generate_access_token(user.username, &config.jwt_secret, config.access_token_ttl);

    info!(user_id = user.id, "Login succeeded");

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
