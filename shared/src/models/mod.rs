//! Data models
//!
//! Shared between talent-server and the dashboard client (via API).
//! Job IDs are opaque strings; ordering lives in the integer `order` field.

pub mod job;

// Re-exports
pub use job::*;
