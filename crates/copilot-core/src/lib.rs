//! Domain types and seams for the Copilot chat client.
//!
//! Nothing in this crate performs I/O beyond reading an upload from disk; the
//! stores and the backend transport are traits implemented by
//! `copilot-infrastructure` and `copilot-interaction`.

pub mod config;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod storage;

// Re-export common error type
pub use error::CopilotError;
