//! Infrastructure layer for Counsel.
//!
//! Contains implementations of the ports defined in `counsel-core`:
//! SQLite storage for users, sessions and messages, HTTP clients for the
//! generation providers, and config file loading.

pub mod config;
pub mod llm;
pub mod sqlite;
