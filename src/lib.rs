//! Greeter API - a small authenticated backend service.
//!
//! Session management (sign-in/up, social login, refresh) is delegated to an
//! externally hosted auth provider; this crate supplies:
//! - the session gate in front of the `/api` routes
//! - CORS for the single configured web origin
//! - the HTTP lifecycle with bounded graceful shutdown

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;
