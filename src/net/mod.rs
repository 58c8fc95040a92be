//! Backend access: wire types, errors, and the HTTP client.

pub mod api;
pub mod error;
pub mod types;

pub use api::{AuthApi, ExpenseApi, HttpApi};
pub use error::ApiError;
