//! Wire models for the Render API

pub mod deploy;
