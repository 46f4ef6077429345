//! Score Index WASM API
//!
//! JavaScript-facing surface over a single loaded score.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros and JsValue conversion
//! - `scores`: score store, loaders, queries, and cursor calls

pub mod helpers;
pub mod scores;

pub use scores::*;
