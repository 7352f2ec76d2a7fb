//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and JSON bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ApiQuery, PeerQuery};
pub use responses::{GroupStatsResponse, HealthResponse, StatsResponse};
