//! Human feedback datasets
//!
//! Folds per-step ratings, structural checks and model usage into one
//! write-once training record, and persists it through a [`DatasetStore`].

pub mod assemble;
pub mod schema;
pub mod store;

pub use assemble::*;
pub use schema::*;
pub use store::*;
