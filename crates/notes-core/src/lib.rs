//! # Secure Notes Core
//!
//! Storage-agnostic logic for Secure Notes: the note model, the scoped
//! storage session trait, an in-memory store, and the note service that
//! turns create/read/update/delete intents into store operations.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. The SQLite
//! backend lives in the `secure-notes` crate.

pub mod models;
pub mod service;
pub mod store;
