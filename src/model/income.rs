use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::model::member::MemberResponse;
use crate::utils::pagination::Pagination;

/// Request body for create/update, also the slim get-by-id view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncomePayload {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub id_member_fk: Option<i64>,
}

impl FromRow<'_, SqliteRow> for IncomePayload {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let raw: String = row.try_get("amount")?;
        let amount = Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
            index: "amount".into(),
            source: Box::new(e),
        })?;
        Ok(Self {
            name: row.try_get("name")?,
            amount,
            id_member_fk: row.try_get("id_member_fk")?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IncomeResponse {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub id_user_fk: i64,
    pub member: Option<MemberResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Decodes rows joined against member, aliased as member_id/member_name.
impl FromRow<'_, SqliteRow> for IncomeResponse {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let raw: String = row.try_get("amount")?;
        let amount = Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
            index: "amount".into(),
            source: Box::new(e),
        })?;
        let member_id: Option<i64> = row.try_get("member_id")?;
        let member_name: Option<String> = row.try_get("member_name")?;
        let member = match (member_id, member_name) {
            (Some(id), Some(name)) => Some(MemberResponse { id, name }),
            _ => None,
        };
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            amount,
            id_user_fk: row.try_get("id_user_fk")?,
            member,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IncomeListResponse {
    pub items: Vec<IncomeResponse>,
    pub pagination: Pagination,
}
