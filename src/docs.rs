use actix_web::HttpResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

use crate::model::essential_expense::{
    EssentialExpenseListResponse, EssentialExpensePayload, EssentialExpenseResponse,
};
use crate::model::income::{IncomeListResponse, IncomePayload, IncomeResponse};
use crate::model::member::{MemberListResponse, MemberPayload, MemberResponse};
use crate::model::month::{Month, MonthListResponse, MonthPayload};
use crate::model::non_essential_expense::{
    NonEssentialExpenseListResponse, NonEssentialExpensePayload, NonEssentialExpenseResponse,
};
use crate::model::user::{UserListResponse, UserPayload, UserResponse};
use crate::models::{LoginRequest, TokenResponse};
use crate::utils::pagination::Pagination;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Home Budget API",
        version = "1.0.0",
        description = r#"
## Personal Household Budgeting API

Track who earns and spends what in a household, month over month.

### Key Features
- **User Management**
  - Register, list, and update user profiles
- **Member Management**
  - Add and maintain the people a budget is split across
- **Income Management**
  - Record recurring earnings, optionally tied to a member
- **Expense Management**
  - Track expected essential costs and discretionary non-essential spending
- **Month Management**
  - Open calendar months linked to every registered user

### Security
Mutating endpoints require **JWT Bearer authentication** obtained from
`POST /auth/token`.

---
Built with **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::users::create_user,
        crate::api::users::read_users,
        crate::api::users::update_user,

        crate::auth::handlers::login,

        crate::api::members::create_member,
        crate::api::members::read_members,
        crate::api::members::read_members_list,
        crate::api::members::update_member,
        crate::api::members::delete_member,

        crate::api::incomes::create_income,
        crate::api::incomes::read_incomes,
        crate::api::incomes::get_income,
        crate::api::incomes::update_income,
        crate::api::incomes::delete_income,

        crate::api::essential_expenses::create_essential_expense,
        crate::api::essential_expenses::read_essential_expenses,
        crate::api::essential_expenses::get_essential_expense,
        crate::api::essential_expenses::update_essential_expense,
        crate::api::essential_expenses::delete_essential_expense,

        crate::api::non_essential_expenses::create_non_essential_expense,
        crate::api::non_essential_expenses::read_non_essential_expenses,
        crate::api::non_essential_expenses::get_non_essential_expense,
        crate::api::non_essential_expenses::update_non_essential_expense,
        crate::api::non_essential_expenses::delete_non_essential_expense,

        crate::api::months::create_month,
        crate::api::months::read_months
    ),
    components(
        schemas(
            UserPayload,
            UserResponse,
            UserListResponse,
            LoginRequest,
            TokenResponse,
            MemberPayload,
            MemberResponse,
            MemberListResponse,
            IncomePayload,
            IncomeResponse,
            IncomeListResponse,
            EssentialExpensePayload,
            EssentialExpenseResponse,
            EssentialExpenseListResponse,
            NonEssentialExpensePayload,
            NonEssentialExpenseResponse,
            NonEssentialExpenseListResponse,
            MonthPayload,
            Month,
            MonthListResponse,
            Pagination
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "User registration and profiles"),
        (name = "auth", description = "Token issuance"),
        (name = "members", description = "Household member management"),
        (name = "incomes", description = "Income tracking"),
        (name = "essential expenses", description = "Expected recurring expenses"),
        (name = "non essential expenses", description = "Discretionary expenses"),
        (name = "months", description = "Calendar month bookkeeping"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        // components is always present, the derive above declares schemas
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
