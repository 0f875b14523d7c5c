//! Signage API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! upload intake) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod net;
pub mod router;
pub mod routes;
pub mod serve;
pub mod state;
pub mod upload;
