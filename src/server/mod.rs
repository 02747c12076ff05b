//! HTTP service mode.
//!
//! This module provides:
//! - The axum router and request handlers (`service`)
//! - Response envelopes and error → status mapping (`response`)
//! - Configuration types (`config`)
//!
//! The handlers own everything request-shaped: parameter parsing, resource
//! allow-listing, pagination bounds, and translating [`HolonetError`] kinds
//! into HTTP statuses. Caching and enrichment stay in the gateway.
//!
//! [`HolonetError`]: crate::HolonetError

pub mod config;
pub mod response;
pub mod service;

pub use service::{AppState, router};
