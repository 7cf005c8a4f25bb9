//! Cost, tool-usage and model-capability accounting for hosted LLM playgrounds.
//!
//! The library is synchronous and side-effect free apart from [`crate::core::load_records`]
//! and [`crate::models::ModelStore`], which touch the filesystem.

pub mod consts;
pub mod core;
pub mod error;
pub mod models;
pub mod pricing;
pub mod tools;
pub mod utils;
