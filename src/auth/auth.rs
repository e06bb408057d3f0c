use actix_web::{dev::Payload, error, web::Data, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::user::User;

/// Authenticated caller, resolved from the bearer token on every protected
/// request. The token only carries the username; the row is re-fetched so a
/// deleted user's outstanding tokens stop working immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?
                .to_string();

            let config = req
                .app_data::<Data<Config>>()
                .ok_or_else(|| error::ErrorInternalServerError("Config missing"))?;

            let pool = req
                .app_data::<Data<SqlitePool>>()
                .ok_or_else(|| error::ErrorInternalServerError("Database pool missing"))?;

            let claims = verify_token(&token, &config.jwt_secret).map_err(|_| {
                ApiError::Unauthorized("Could not validate credentials".to_string())
            })?;

            let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE username = ?")
                .bind(&claims.sub)
                .fetch_optional(pool.get_ref())
                .await
                .map_err(ApiError::Database)?
                .ok_or_else(|| {
                    ApiError::Unauthorized("Could not validate credentials".to_string())
                })?;

            Ok(CurrentUser {
                id: user.id,
                name: user.name,
                username: user.username,
                email: user.email,
            })
        })
    }
}
