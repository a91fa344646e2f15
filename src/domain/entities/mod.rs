pub mod ranked;
pub mod restaurant;
