pub mod essential_expense;
pub mod income;
pub mod member;
pub mod month;
pub mod non_essential_expense;
pub mod user;
