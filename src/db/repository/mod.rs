//! Repository trait: the abstract storage interface for timetable data.
//!
//! All mutating operations that depend on previously read state take an
//! `expected_version` and fail with a retryable
//! [`RepositoryError::VersionConflict`] when the scope has moved on, so
//! every check-then-act sequence in the service layer is safe under
//! concurrent callers.

pub mod error;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::api::{DraftId, GroupId, InstructorId, MeetingId, ReferenceGroupId, RoomId, SectionId, SubjectId};
use crate::conflict::{ConflictIndex, ConflictScope};
use crate::engine::Placement;
use crate::models::day::Weekday;
use crate::models::schedule::{
    Catalog, Draft, Reference, ReferenceGroup, ScheduleEntry, ScheduleGroup, ScheduleMeeting,
    Semester,
};
use crate::models::time::TimeSlot;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A consistent read of one scope: its meetings (with owning-entry
/// sections), its version token, optional reference rows and the current
/// catalog. Taken in one lock acquisition so the engine plans against a
/// coherent picture.
#[derive(Debug, Clone)]
pub struct TimetableSnapshot {
    pub scope: ConflictScope,
    pub version: u64,
    pub meetings: Vec<(ScheduleMeeting, SectionId)>,
    pub references: Vec<Reference>,
    pub catalog: Catalog,
}

impl TimetableSnapshot {
    /// Build a conflict index over this snapshot.
    pub fn build_index(&self) -> ConflictIndex {
        let mut index = ConflictIndex::new(self.scope);
        for (meeting, section) in &self.meetings {
            index.insert_meeting(meeting, *section);
        }
        index.add_reference_rows(&self.references);
        index
    }
}

/// One entry with its meetings, as returned by timetable reads.
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithMeetings {
    pub entry: ScheduleEntry,
    pub meetings: Vec<ScheduleMeeting>,
}

/// A meeting plus the context needed to conflict-check an edit against it.
#[derive(Debug, Clone)]
pub struct MeetingRecord {
    pub meeting: ScheduleMeeting,
    pub subject: SubjectId,
    pub section: SectionId,
    pub scope: ConflictScope,
    /// Version of the owning scope at read time
    pub version: u64,
}

/// Natural-key lookup for meetings when no id is at hand. Optional fields
/// narrow the match; operations using a locator require it to resolve to
/// exactly one meeting.
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingLocator {
    pub group: GroupId,
    pub subject_code: String,
    pub section_code: String,
    #[serde(default)]
    pub day: Option<Weekday>,
    #[serde(default)]
    pub start: Option<NaiveTime>,
}

/// An engine plan handed over for atomic persistence.
#[derive(Debug, Clone)]
pub struct GenerationBatch {
    pub placements: Vec<Placement>,
}

/// Ids allocated for a committed generation batch.
#[derive(Debug, Clone)]
pub struct CommittedBatch {
    pub entries: Vec<ScheduleEntry>,
    pub meetings: Vec<ScheduleMeeting>,
}

/// Fully resolved replacement values for one meeting. Resolution of
/// keep-current semantics happens in the service layer; the repository
/// stores exactly what it is given (after its own invariant backstop).
#[derive(Debug, Clone)]
pub struct MeetingUpdate {
    pub day: Weekday,
    pub slot: TimeSlot,
    pub room: RoomId,
    pub instructor: Option<InstructorId>,
}

/// Abstract storage interface for timetable data.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Groups ====================

    async fn create_group(
        &self,
        department: &str,
        school_year: &str,
        semester: Semester,
    ) -> RepositoryResult<ScheduleGroup>;

    async fn get_group(&self, id: GroupId) -> RepositoryResult<ScheduleGroup>;

    async fn list_groups(&self) -> RepositoryResult<Vec<ScheduleGroup>>;

    /// Flip every planned entry of the group to confirmed. Returns the
    /// number of entries confirmed.
    async fn confirm_group(&self, group: GroupId, expected_version: u64)
        -> RepositoryResult<usize>;

    // ==================== Catalog ====================

    /// Replace the stored resource catalog.
    async fn put_catalog(&self, catalog: &Catalog) -> RepositoryResult<()>;

    async fn get_catalog(&self) -> RepositoryResult<Catalog>;

    // ==================== Snapshots ====================

    /// Take a consistent read of one scope, optionally unioned with the
    /// rows of a reference group.
    async fn snapshot(
        &self,
        scope: ConflictScope,
        reference: Option<ReferenceGroupId>,
    ) -> RepositoryResult<TimetableSnapshot>;

    // ==================== Timetable reads ====================

    async fn list_entries(&self, group: GroupId) -> RepositoryResult<Vec<EntryWithMeetings>>;

    async fn get_meeting(&self, id: MeetingId) -> RepositoryResult<MeetingRecord>;

    /// All meetings matching a natural-key locator, in id order.
    async fn find_meetings(&self, locator: &MeetingLocator)
        -> RepositoryResult<Vec<MeetingRecord>>;

    // ==================== Commits ====================

    /// Persist a generation batch atomically: either every entry and
    /// meeting is stored and the group version bumped, or nothing is.
    async fn commit_generation(
        &self,
        group: GroupId,
        expected_version: u64,
        batch: GenerationBatch,
    ) -> RepositoryResult<CommittedBatch>;

    /// Replace one meeting's placement under a version check.
    async fn commit_meeting_update(
        &self,
        id: MeetingId,
        update: MeetingUpdate,
        expected_version: u64,
    ) -> RepositoryResult<ScheduleMeeting>;

    // ==================== Drafts ====================

    async fn create_draft(&self, group: GroupId, name: &str) -> RepositoryResult<Draft>;

    /// Create a draft pre-populated with copies of the group's current
    /// entries and meetings.
    async fn copy_group_to_draft(&self, group: GroupId, name: &str) -> RepositoryResult<Draft>;

    async fn list_drafts(&self, group: GroupId) -> RepositoryResult<Vec<Draft>>;

    /// Delete a draft and everything in it.
    async fn discard_draft(&self, draft: DraftId) -> RepositoryResult<()>;

    // ==================== Reference timetables ====================

    async fn add_reference_group(
        &self,
        school_year: &str,
        education_level: &str,
        year_level: u8,
    ) -> RepositoryResult<ReferenceGroup>;

    /// Append reference rows to a reference group. Returns how many rows
    /// were stored.
    async fn add_references(
        &self,
        group: ReferenceGroupId,
        rows: Vec<Reference>,
    ) -> RepositoryResult<usize>;

    async fn list_reference_groups(&self) -> RepositoryResult<Vec<ReferenceGroup>>;
}
