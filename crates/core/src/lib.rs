//! Domain types and rules for the signage server.
//!
//! Everything here is free of HTTP and persistence concerns: file records
//! and their ordering, the display configuration document, upload policy,
//! and first-page PDF rasterization.

pub mod display_config;
pub mod error;
pub mod file_record;
pub mod pdf;
pub mod types;
pub mod upload_policy;
