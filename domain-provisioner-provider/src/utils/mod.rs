//! Utility modules.

/// Exponential backoff for retried HTTP calls.
pub mod backoff;

/// Date/time serialization helpers shared by the model types.
pub mod datetime;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
