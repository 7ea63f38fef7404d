//! Core logic — types, record codec, catalog, prep list, aggregation, storage.

pub mod aggregate;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod prep;
pub mod store;
pub mod types;
