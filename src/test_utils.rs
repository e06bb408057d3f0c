use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::hash_password;
use crate::config::Config;

/// Fresh in-memory database. Capped at one connection so every query in a
/// test sees the same `:memory:` instance.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        access_token_ttl: 1800,
    }
}

pub fn token_for(config: &Config, username: &str) -> String {
    generate_access_token(
        username.to_string(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
}

pub async fn seed_user(pool: &SqlitePool, username: &str, email: &str, password: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO user (name, username, email, password) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(username)
    .bind(username)
    .bind(email)
    .bind(hash_password(password))
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

pub async fn seed_member(pool: &SqlitePool, user_id: i64, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO member (name, id_user_fk) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to seed member")
}

pub async fn seed_income(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    amount: &str,
    member_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO income (name, amount, id_user_fk, id_member_fk) VALUES (?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(name)
    .bind(amount)
    .bind(user_id)
    .bind(member_id)
    .fetch_one(pool)
    .await
    .expect("Failed to seed income")
}

pub async fn seed_essential_expense(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    expected: &str,
    member_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO essential_expense (name, expected, id_user_fk, id_member_fk) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(expected)
    .bind(user_id)
    .bind(member_id)
    .fetch_one(pool)
    .await
    .expect("Failed to seed essential expense")
}

pub async fn seed_non_essential_expense(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    expected: &str,
    member_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO non_essential_expense (name, expected, id_user_fk, id_member_fk) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(expected)
    .bind(user_id)
    .bind(member_id)
    .fetch_one(pool)
    .await
    .expect("Failed to seed non-essential expense")
}

/// Spins up the full service against a fresh pool. Yields the service plus
/// the pool and config so tests can seed rows and mint tokens.
macro_rules! test_app {
    () => {{
        let pool = crate::test_utils::test_pool().await;
        let config = crate::test_utils::test_config();
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::new(pool.clone()))
                .app_data(actix_web::web::Data::new(config.clone()))
                .service(crate::index)
                .configure(crate::routes::configure),
        )
        .await;
        (app, pool, config)
    }};
}
pub(crate) use test_app;
