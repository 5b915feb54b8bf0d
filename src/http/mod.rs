//! HTTP server module for the timetabling backend.
//!
//! An axum-based REST API over the service layer. Handlers parse and
//! validate requests, delegate to `crate::services`, and translate the
//! domain error taxonomy into status codes: validation failures are 400,
//! missing resources 404, and both scheduling conflicts and lost version
//! races 409 with structured detail.

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
