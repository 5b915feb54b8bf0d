//! # CTS Rust Backend
//!
//! Conflict-free course timetabling engine.
//!
//! This crate provides the scheduling core for an academic Course Timetabling
//! System (CTS): it assigns subject/section offerings to instructors, rooms and
//! weekly time windows, keeps the resulting timetable free of instructor, room
//! and section conflicts, and validates interactive single-meeting edits
//! against the rest of the timetable transactionally. The backend exposes a
//! REST API via Axum for the frontend.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: ID newtypes and Data Transfer Objects shared across layers
//! - [`models`]: domain model (day calendar, time slots, schedule entities,
//!   generation demands)
//! - [`conflict`]: the conflict index answering overlap queries per scope
//! - [`engine`]: the assignment engine placing demands under hard constraints
//! - [`services`]: business logic over the repository (generation runs, edit
//!   validation, alternative suggestion)
//! - [`db`]: repository trait, in-memory backend and persistence seam
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Conflict semantics
//!
//! All conflict checks operate at meeting granularity on half-open time
//! intervals: two meetings collide only when they share a constrained resource
//! (instructor, room or section), fall on a common canonical weekday and their
//! intervals strictly overlap. Touching endpoints are not a conflict.

// Allow large error types - TimetableError carries the full conflict list
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod conflict;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
