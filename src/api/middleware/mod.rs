//! HTTP middleware for request processing and protection.
//!
//! Provides the admin bearer guard and request tracing.

pub mod auth;
pub mod tracing;
