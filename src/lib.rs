//! # expense-advisor
//!
//! Client library for the Expense Advisor personal finance backend.
//!
//! The heart of the crate is the session lifecycle in [`state`]: a pure
//! session store, the route selector that decides between sign-in,
//! onboarding and the main app, and the [`state::AuthSession`] service that
//! drives both from backend calls and the persisted token. [`net`] holds the
//! REST client, [`services`] the individual app flows (profile setup, month
//! listings, reports, AI chat), and [`storage`] the token persistence.

pub mod config;
pub mod net;
pub mod services;
pub mod state;
pub mod storage;
