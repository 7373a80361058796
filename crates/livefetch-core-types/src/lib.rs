//! Core types shared across livefetch facilities
//!
//! This crate provides foundational types used by the kernel, the
//! controller and the logging facility:
//!
//! - **Correlation types**: RequestId, RefreshToken, Generation
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{Generation, RefreshToken, RequestId};
