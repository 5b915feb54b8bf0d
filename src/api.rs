//! Public API surface for the Rust backend.
//!
//! This file consolidates the ID newtypes and the DTO types shared between the
//! service layer and the HTTP API. All types derive Serialize/Deserialize for
//! JSON serialization.

use serde::{Deserialize, Serialize};

use crate::define_id_type;
use crate::models::day::Weekday;
use crate::models::time::TimeSlot;
use crate::models::ScheduleEntry;
use crate::models::ScheduleMeeting;

define_id_type!(
    GroupId,
    SubjectId,
    SectionId,
    InstructorId,
    RoomId,
    EntryId,
    MeetingId,
    DraftId,
    ReferenceGroupId,
);

/// Resource types subject to hard conflict constraints.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Instructor,
    Room,
    Section,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Instructor => write!(f, "instructor"),
            ResourceKind::Room => write!(f, "room"),
            ResourceKind::Section => write!(f, "section"),
        }
    }
}

/// Where a colliding meeting lives: the confirmed timetable of a group, a
/// speculative draft, or an externally supplied reference schedule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingOrigin {
    Group,
    Draft,
    Reference,
}

/// One colliding meeting, reported for diagnostic display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictHit {
    /// Which constrained resource collided
    pub resource: ResourceKind,
    /// The id of the colliding resource
    pub resource_id: i64,
    /// The colliding meeting, if it is an owned meeting (reference rows have none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<MeetingId>,
    /// The owning entry of the colliding meeting, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<EntryId>,
    /// Day on which the collision occurs
    pub day: Weekday,
    /// Time window of the colliding meeting
    pub slot: TimeSlot,
    /// Where the colliding meeting lives
    pub origin: MeetingOrigin,
}

/// Conflict-check result exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOutcome {
    /// True when the proposed change collides with nothing
    pub ok: bool,
    /// The full set of colliding meetings when `ok` is false
    pub conflicts: Vec<ConflictHit>,
}

impl EditOutcome {
    pub fn clean() -> Self {
        Self {
            ok: true,
            conflicts: Vec::new(),
        }
    }

    pub fn rejected(conflicts: Vec<ConflictHit>) -> Self {
        Self {
            ok: false,
            conflicts,
        }
    }
}

/// A demand the engine could not place within its search bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsatisfiedDemand {
    pub subject: SubjectId,
    pub section: SectionId,
    /// Why the demand could not be placed
    pub reason: String,
}

/// Search statistics for a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Number of demands submitted
    pub demands: usize,
    /// Number of demands fully placed
    pub placed: usize,
    /// Candidate assignments evaluated
    pub candidates_tried: u64,
    /// Backtracking steps taken
    pub backtracks: u32,
    /// True when the effort budget or deadline cut the search short
    pub budget_exhausted: bool,
}

/// Result of one committed generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Entries created by this run
    pub entries: Vec<ScheduleEntry>,
    /// Meetings created by this run
    pub meetings: Vec<ScheduleMeeting>,
    /// Demands that could not be placed
    pub unsatisfied: Vec<UnsatisfiedDemand>,
    /// Search statistics
    pub stats: GenerationStats,
}

/// A candidate day/time/room/instructor combination proposed by the
/// alternative suggester, ranked by distance from the original request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    pub day: Weekday,
    pub slot: TimeSlot,
    pub room: RoomId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<InstructorId>,
    /// Distance score from the requested day/time (lower is closer)
    pub distance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_newtype_roundtrip() {
        let id = MeetingId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(MeetingId::from(42), id);
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn test_resource_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ResourceKind::Instructor).unwrap();
        assert_eq!(json, "\"instructor\"");
    }

    #[test]
    fn test_edit_outcome_constructors() {
        assert!(EditOutcome::clean().ok);
        let rejected = EditOutcome::rejected(vec![]);
        assert!(!rejected.ok);
    }
}
