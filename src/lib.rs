//! render-deploy library
//!
//! Core modules for triggering a deploy of a Render service from a CI
//! pipeline and optionally waiting for it to reach a terminal state.

pub mod config;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
