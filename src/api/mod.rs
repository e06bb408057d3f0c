pub mod essential_expenses;
pub mod incomes;
pub mod members;
pub mod months;
pub mod non_essential_expenses;
pub mod users;
