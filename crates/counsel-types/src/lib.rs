//! Shared domain types for Counsel.
//!
//! This crate contains the core domain types used across the Counsel
//! career-counseling backend: users, chat sessions, messages, LLM
//! request/response shapes, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod user;
