//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` is the pure store, `route` derives the top-level screen from it,
//! and `auth` drives the store from backend calls and persisted storage.

pub mod auth;
pub mod route;
pub mod session;

pub use auth::{AuthFailure, AuthSession};
pub use route::{AuthScreen, Route, select_route};
pub use session::{Session, SessionEvent};
