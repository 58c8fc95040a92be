//! App workflows built on the session and the API client.
//!
//! DESIGN
//! ======
//! Each module is one user-facing flow. Services validate input locally
//! first (`forms`), so malformed input never costs a request, then call the
//! backend through the `AuthApi` / `ExpenseApi` traits.

pub mod chat;
pub mod forms;
pub mod ledger;
pub mod profile;
pub mod reports;
