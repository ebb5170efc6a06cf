//! §4.5 Session Gateway: the WebSocket front door onto the Room actors.
//!
//! Split into a library (this crate) plus a thin `main.rs` binary so the
//! `tests/` integration suite can construct the same `axum::Router` the
//! binary serves, matching the corpus's habit of keeping service entry
//! points callable from their own test harness.

pub mod config;
pub mod connection;
pub mod rooms;
pub mod ws;

pub use config::Config;
pub use connection::AppState;
pub use rooms::RoomRegistry;
