//! MBTA v3 API client.
//!
//! Thin read-only client over the three JSON:API endpoints the
//! pipelines consume: stops filtered by route, canonical route
//! patterns with representative trips, and shapes by ID.

mod client;
pub mod models;

pub use client::{MbtaClient, MbtaError};
