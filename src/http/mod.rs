//! Render API client

pub mod client;
pub mod deploys;
