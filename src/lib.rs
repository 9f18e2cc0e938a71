//! # Secure Notes
//!
//! A small note-taking service: notes live in a single SQLite table and are
//! exposed through a four-endpoint JSON HTTP API and a matching CLI.
//!
//! ## Architecture
//!
//! ```text
//!  ┌──────────┐   ┌──────────┐
//!  │   CLI    │   │   HTTP   │
//!  │ (notes)  │   │  (axum)  │
//!  └────┬─────┘   └────┬─────┘
//!       └──────┬───────┘
//!              ▼
//!      ┌───────────────┐   ┌──────────┐
//!      │  NoteService  │──▶│  SQLite  │
//!      │ (notes-core)  │   │  notes   │
//!      └───────────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! notes init                                   # create database
//! notes create --title "Hi" --content "First"  # create a note
//! notes serve                                  # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`db`] | Storage connection and per-request sessions |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite implementation of the note store |
//! | [`server`] | HTTP API |
//! | [`commands`] | CLI command implementations |
//! | [`logging`] | `tracing` subscriber setup |

pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod migrate;
pub mod server;
pub mod sqlite_store;

pub use notes_core::models::{NewNote, Note, NoteUpdate};
pub use notes_core::service::{NoteError, NoteService};
