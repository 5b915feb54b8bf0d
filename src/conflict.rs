//! Conflict index: the queryable view of existing meetings used by every
//! conflict check.
//!
//! An index is built from an in-memory snapshot of one scope (the confirmed
//! meetings of a schedule group, or the meetings of a draft), optionally
//! unioned with one externally supplied reference set. Different groups never
//! see each other: cross-group comparison happens only through the explicit
//! reference opt-in.
//!
//! Queries follow the hard-constraint matching rule: a stored meeting
//! collides with the queried window when it falls on one of the queried
//! days, its interval strictly overlaps, and it shares any of the provided
//! resource criteria (instructor, room or section). Providing no criterion
//! asks about no resource, so the answer is vacuously "no conflict".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::{
    ConflictHit, DraftId, EntryId, GroupId, InstructorId, MeetingId, MeetingOrigin, ResourceKind,
    RoomId, SectionId,
};
use crate::models::day::{parse_combined_days, Weekday};
use crate::models::schedule::{Reference, ScheduleMeeting};
use crate::models::time::TimeSlot;

/// Which timetable a conflict check is scoped to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictScope {
    Group(GroupId),
    Draft(DraftId),
}

/// One indexed meeting row. Reference rows have no meeting/entry ids.
#[derive(Debug, Clone)]
struct IndexedMeeting {
    meeting: Option<MeetingId>,
    entry: Option<EntryId>,
    instructor: Option<InstructorId>,
    room: Option<RoomId>,
    section: Option<SectionId>,
    day: Weekday,
    slot: TimeSlot,
    origin: MeetingOrigin,
}

/// A conflict query against one scope.
#[derive(Debug, Clone)]
pub struct ConflictQuery {
    pub instructor: Option<InstructorId>,
    pub room: Option<RoomId>,
    pub section: Option<SectionId>,
    /// Day token, possibly combined (e.g. `"MonSat"`); expanded per query
    pub day: String,
    pub slot: TimeSlot,
    /// Meeting to ignore, so edit validation can exclude the meeting being moved
    pub exclude_meeting: Option<MeetingId>,
}

impl ConflictQuery {
    pub fn new(day: impl Into<String>, slot: TimeSlot) -> Self {
        Self {
            instructor: None,
            room: None,
            section: None,
            day: day.into(),
            slot,
            exclude_meeting: None,
        }
    }

    pub fn instructor(mut self, id: InstructorId) -> Self {
        self.instructor = Some(id);
        self
    }

    pub fn instructor_opt(mut self, id: Option<InstructorId>) -> Self {
        self.instructor = id;
        self
    }

    pub fn room(mut self, id: RoomId) -> Self {
        self.room = Some(id);
        self
    }

    pub fn section(mut self, id: SectionId) -> Self {
        self.section = Some(id);
        self
    }

    pub fn exclude(mut self, id: MeetingId) -> Self {
        self.exclude_meeting = Some(id);
        self
    }

    fn has_criteria(&self) -> bool {
        self.instructor.is_some() || self.room.is_some() || self.section.is_some()
    }
}

/// Queryable index of the meetings in one scope.
pub struct ConflictIndex {
    scope: ConflictScope,
    rows: HashMap<MeetingId, IndexedMeeting>,
    by_day: [Vec<MeetingId>; 7],
    reference: Vec<IndexedMeeting>,
    ref_by_day: [Vec<usize>; 7],
    /// Synthetic ids handed out for planned (not yet persisted) meetings.
    /// Negative so they can never collide with repository-allocated ids.
    next_planned: i64,
}

impl ConflictIndex {
    pub fn new(scope: ConflictScope) -> Self {
        Self {
            scope,
            rows: HashMap::new(),
            by_day: Default::default(),
            reference: Vec::new(),
            ref_by_day: Default::default(),
            next_planned: -1,
        }
    }

    pub fn scope(&self) -> ConflictScope {
        self.scope
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index one stored meeting. `section` is the section of the owning
    /// entry; conflict matching needs it because section constraints live on
    /// the entry, not the meeting.
    pub fn insert_meeting(&mut self, meeting: &ScheduleMeeting, section: SectionId) {
        let origin = match self.scope {
            ConflictScope::Group(_) => MeetingOrigin::Group,
            ConflictScope::Draft(_) => MeetingOrigin::Draft,
        };
        let row = IndexedMeeting {
            meeting: Some(meeting.id),
            entry: Some(meeting.entry),
            instructor: meeting.instructor,
            room: Some(meeting.room),
            section: Some(section),
            day: meeting.day,
            slot: meeting.slot,
            origin,
        };
        self.by_day[meeting.day.index()].push(meeting.id);
        self.rows.insert(meeting.id, row);
    }

    /// Index a planned meeting that has no repository id yet (engine
    /// commitments during a generation run). Returns a synthetic id usable
    /// with [`ConflictIndex::remove`] for backtracking.
    pub fn insert_planned(
        &mut self,
        instructor: Option<InstructorId>,
        room: RoomId,
        section: SectionId,
        day: Weekday,
        slot: TimeSlot,
    ) -> MeetingId {
        let id = MeetingId::new(self.next_planned);
        self.next_planned -= 1;
        let origin = match self.scope {
            ConflictScope::Group(_) => MeetingOrigin::Group,
            ConflictScope::Draft(_) => MeetingOrigin::Draft,
        };
        let row = IndexedMeeting {
            meeting: Some(id),
            entry: None,
            instructor,
            room: Some(room),
            section: Some(section),
            day,
            slot,
            origin,
        };
        self.by_day[day.index()].push(id);
        self.rows.insert(id, row);
        id
    }

    /// Drop a meeting from the index (engine backtracking).
    pub fn remove(&mut self, id: MeetingId) {
        if let Some(row) = self.rows.remove(&id) {
            self.by_day[row.day.index()].retain(|m| *m != id);
        }
    }

    /// Union externally supplied reference rows into the index. Their
    /// combined day tokens are expanded here, once; a row occupies one index
    /// slot per expanded day.
    pub fn add_reference_rows(&mut self, rows: &[Reference]) {
        for reference in rows {
            let days = parse_combined_days(&reference.days);
            if days.is_empty() {
                log::warn!(
                    "reference row {:?} has unusable day token {:?}, skipping",
                    reference.description,
                    reference.days
                );
                continue;
            }
            for day in days.iter() {
                let idx = self.reference.len();
                self.reference.push(IndexedMeeting {
                    meeting: None,
                    entry: None,
                    instructor: reference.instructor,
                    room: reference.room,
                    section: reference.section,
                    day,
                    slot: reference.slot,
                    origin: MeetingOrigin::Reference,
                });
                self.ref_by_day[day.index()].push(idx);
            }
        }
    }

    /// Does any in-scope meeting collide with the queried window for any of
    /// the provided resource criteria?
    pub fn has_conflict(&self, query: &ConflictQuery) -> bool {
        if !query.has_criteria() {
            return false;
        }
        let days = parse_combined_days(&query.day);
        for day in days.iter() {
            if self.scan_day(day, query, &mut |_| true) {
                return true;
            }
        }
        false
    }

    /// Full set of colliding meetings for diagnostic display.
    pub fn find_conflicts(&self, query: &ConflictQuery) -> Vec<ConflictHit> {
        let mut hits = Vec::new();
        if !query.has_criteria() {
            return hits;
        }
        let days = parse_combined_days(&query.day);
        for day in days.iter() {
            self.scan_day(day, query, &mut |hit| {
                hits.push(hit);
                false
            });
        }
        hits
    }

    /// Walk one day's rows; `sink` receives each hit and returns true to
    /// short-circuit.
    fn scan_day(
        &self,
        day: Weekday,
        query: &ConflictQuery,
        sink: &mut dyn FnMut(ConflictHit) -> bool,
    ) -> bool {
        for id in &self.by_day[day.index()] {
            if query.exclude_meeting == Some(*id) {
                continue;
            }
            let row = &self.rows[id];
            if let Some(hit) = match_row(row, query) {
                if sink(hit) {
                    return true;
                }
            }
        }
        for idx in &self.ref_by_day[day.index()] {
            let row = &self.reference[*idx];
            if let Some(hit) = match_row(row, query) {
                if sink(hit) {
                    return true;
                }
            }
        }
        false
    }
}

/// Match one indexed row against a query; any provided criterion suffices.
/// Instructor takes reporting priority over room, room over section.
fn match_row(row: &IndexedMeeting, query: &ConflictQuery) -> Option<ConflictHit> {
    if !row.slot.overlaps(&query.slot) {
        return None;
    }

    let matched = query
        .instructor
        .filter(|id| row.instructor == Some(*id))
        .map(|id| (ResourceKind::Instructor, id.value()))
        .or_else(|| {
            query
                .room
                .filter(|id| row.room == Some(*id))
                .map(|id| (ResourceKind::Room, id.value()))
        })
        .or_else(|| {
            query
                .section
                .filter(|id| row.section == Some(*id))
                .map(|id| (ResourceKind::Section, id.value()))
        });

    matched.map(|(resource, resource_id)| ConflictHit {
        resource,
        resource_id,
        meeting_id: row.meeting,
        entry_id: row.entry,
        day: row.day,
        slot: row.slot,
        origin: row.origin,
    })
}
