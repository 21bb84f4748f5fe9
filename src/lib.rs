//! Riftwatch - rate-aware game statistics API client
//!
//! This crate wraps the legacy League of Legends REST API. It tracks
//! outbound requests against every externally imposed rate limit tier so
//! callers can stay under them, and maps API responses to typed results.

pub mod api;
pub mod config;
pub mod error;
pub mod ratelimit;

pub use api::{ApiClient, Lookup, Region};
pub use error::{ApiError, ErrorKind, Result, RiftwatchError};
