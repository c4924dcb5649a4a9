//! authgate: an HTTP API gateway that authenticates every request with one
//! of a closed set of strategies (Basic credentials or session cookies)
//! before any route runs.

pub mod auth;
pub mod config;
pub mod gateway;
pub mod session;
pub mod users;
