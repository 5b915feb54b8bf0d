//! Domain error taxonomy for the scheduling core.
//!
//! Input-validation failures (`InvalidDayToken`, `InvalidTimeRange`) are
//! rejected before any conflict check and never reach storage. Conflict and
//! locator failures fail closed with structured detail. Storage-level errors
//! pass through from the repository layer.

use chrono::NaiveTime;

use crate::api::{ConflictHit, RoomId};
use crate::db::repository::RepositoryError;

/// Result type for scheduling operations.
pub type TimetableResult<T> = Result<T, TimetableError>;

#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// A day token could not be normalized to a canonical weekday.
    #[error("unrecognized day token {token:?}")]
    InvalidDayToken { token: String },

    /// A section code did not yield structured year-level/block fields.
    #[error("malformed section code {code:?}")]
    InvalidSectionCode { code: String },

    /// A proposed time window has `start >= end`.
    #[error("invalid time range: start {start} must be before end {end}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    /// The proposed change collides with existing meetings. Carries the full
    /// set of colliding meetings for diagnostic display; the triggering
    /// change is never committed.
    #[error("resource conflict with {} existing meeting(s)", conflicts.len())]
    ResourceConflict { conflicts: Vec<ConflictHit> },

    /// No meeting matches the given id or locator.
    #[error("meeting not found: {detail}")]
    MeetingNotFound { detail: String },

    /// A locator matched more than one meeting; locator-based operations
    /// fail closed rather than guessing.
    #[error("ambiguous locator: {matches} meetings match, expected exactly one")]
    AmbiguousLocator { matches: usize },

    /// A lab meeting was pointed at a room without the lab flag.
    #[error("room {room} is not flagged as a lab room")]
    LabRoomRequired { room: RoomId },

    /// Optimistic-concurrency retries were exhausted; the caller should
    /// retry the whole operation.
    #[error("concurrent modification: gave up after {attempts} attempt(s)")]
    ConcurrentModification { attempts: u32 },

    /// Storage collaborator failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TimetableError {
    /// Colliding meetings carried by a `ResourceConflict`, empty otherwise.
    pub fn conflicts(&self) -> &[ConflictHit] {
        match self {
            TimetableError::ResourceConflict { conflicts } => conflicts,
            _ => &[],
        }
    }
}
