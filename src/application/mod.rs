pub mod chat;
pub mod preprocess;
pub mod recommend;
