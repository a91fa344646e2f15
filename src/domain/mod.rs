pub mod entities;
pub mod error;
pub mod ports;
pub mod text;
pub mod values;
