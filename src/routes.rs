use crate::{
    api::{essential_expenses, incomes, members, months, non_essential_expenses, users},
    auth::handlers,
    docs,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            // /users
            .service(
                web::resource("")
                    .route(web::post().to(users::create_user))
                    .route(web::get().to(users::read_users)),
            )
            // /users/{user_id}
            .service(web::resource("/{user_id}").route(web::put().to(users::update_user))),
    );

    cfg.service(
        web::scope("/auth")
            .service(web::resource("/token").route(web::post().to(handlers::login))),
    );

    cfg.service(
        web::scope("/members")
            // /members
            .service(
                web::resource("")
                    .route(web::post().to(members::create_member))
                    .route(web::get().to(members::read_members)),
            )
            // /members/list, registered ahead of the id matcher
            .service(web::resource("/list").route(web::get().to(members::read_members_list)))
            // /members/{member_id}
            .service(
                web::resource("/{member_id}")
                    .route(web::put().to(members::update_member))
                    .route(web::delete().to(members::delete_member)),
            ),
    );

    cfg.service(
        web::scope("/incomes")
            // /incomes
            .service(
                web::resource("")
                    .route(web::post().to(incomes::create_income))
                    .route(web::get().to(incomes::read_incomes)),
            )
            // /incomes/{income_id}
            .service(
                web::resource("/{income_id}")
                    .route(web::get().to(incomes::get_income))
                    .route(web::put().to(incomes::update_income))
                    .route(web::delete().to(incomes::delete_income)),
            ),
    );

    cfg.service(
        web::scope("/essential-expenses")
            .service(
                web::resource("")
                    .route(web::post().to(essential_expenses::create_essential_expense))
                    .route(web::get().to(essential_expenses::read_essential_expenses)),
            )
            .service(
                web::resource("/{expense_id}")
                    .route(web::get().to(essential_expenses::get_essential_expense))
                    .route(web::put().to(essential_expenses::update_essential_expense))
                    .route(web::delete().to(essential_expenses::delete_essential_expense)),
            ),
    );

    cfg.service(
        web::scope("/non-essential-expenses")
            .service(
                web::resource("")
                    .route(web::post().to(non_essential_expenses::create_non_essential_expense))
                    .route(web::get().to(non_essential_expenses::read_non_essential_expenses)),
            )
            .service(
                web::resource("/{expense_id}")
                    .route(web::get().to(non_essential_expenses::get_non_essential_expense))
                    .route(web::put().to(non_essential_expenses::update_non_essential_expense))
                    .route(
                        web::delete().to(non_essential_expenses::delete_non_essential_expense),
                    ),
            ),
    );

    cfg.service(
        web::scope("/months").service(
            web::resource("")
                .route(web::post().to(months::create_month))
                .route(web::get().to(months::read_months)),
        ),
    );

    cfg.service(
        web::resource("/api-doc/openapi.json").route(web::get().to(docs::openapi_json)),
    );
}
