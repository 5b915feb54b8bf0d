//! In-memory repository implementation.
//!
//! Backs unit tests and local development. All state lives behind one
//! `parking_lot::RwLock`; every commit re-checks its version token and the
//! hard scheduling invariants under the write lock, so the in-memory
//! backend gives the same serializable commit semantics a database backend
//! would.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{
    DraftId, EntryId, GroupId, MeetingId, ReferenceGroupId, SectionId,
};
use crate::conflict::ConflictScope;
use crate::db::repository::{
    CommittedBatch, EntryWithMeetings, ErrorContext, GenerationBatch, MeetingLocator,
    MeetingRecord, MeetingUpdate, RepositoryError, RepositoryResult, TimetableRepository,
    TimetableSnapshot,
};
use crate::models::schedule::{
    Catalog, Draft, DraftEntry, EntryStatus, MeetingType, Reference, ReferenceGroup,
    ScheduleEntry, ScheduleGroup, ScheduleMeeting, Semester,
};

#[derive(Default)]
struct Store {
    groups: HashMap<GroupId, ScheduleGroup>,
    entries: HashMap<EntryId, ScheduleEntry>,
    drafts: HashMap<DraftId, Draft>,
    draft_entries: HashMap<EntryId, DraftEntry>,
    /// Meetings of both groups and drafts; the owning entry decides which.
    meetings: HashMap<MeetingId, ScheduleMeeting>,
    reference_groups: HashMap<ReferenceGroupId, ReferenceGroup>,
    references: Vec<Reference>,
    catalog: Catalog,
    next_id: i64,
}

impl Store {
    fn alloc(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn scope_version(&self, scope: ConflictScope) -> RepositoryResult<u64> {
        match scope {
            ConflictScope::Group(id) => self
                .groups
                .get(&id)
                .map(|g| g.version)
                .ok_or_else(|| group_not_found(id)),
            ConflictScope::Draft(id) => self
                .drafts
                .get(&id)
                .map(|d| d.version)
                .ok_or_else(|| draft_not_found(id)),
        }
    }

    fn bump_version(&mut self, scope: ConflictScope) {
        match scope {
            ConflictScope::Group(id) => {
                if let Some(group) = self.groups.get_mut(&id) {
                    group.version += 1;
                }
            }
            ConflictScope::Draft(id) => {
                if let Some(draft) = self.drafts.get_mut(&id) {
                    draft.version += 1;
                }
            }
        }
    }

    fn check_version(
        &self,
        scope: ConflictScope,
        expected: u64,
        operation: &str,
    ) -> RepositoryResult<()> {
        let current = self.scope_version(scope)?;
        if current != expected {
            return Err(RepositoryError::version_conflict_with_context(
                format!("expected version {expected}, found {current}"),
                ErrorContext::new(operation).with_details(format!("{scope:?}")),
            ));
        }
        Ok(())
    }

    /// Scope membership of a meeting, resolved through its owning entry.
    fn meeting_scope(&self, meeting: &ScheduleMeeting) -> Option<(ConflictScope, SectionId, crate::api::SubjectId)> {
        if let Some(entry) = self.entries.get(&meeting.entry) {
            return Some((ConflictScope::Group(entry.group), entry.section, entry.subject));
        }
        if let Some(entry) = self.draft_entries.get(&meeting.entry) {
            return Some((ConflictScope::Draft(entry.draft), entry.section, entry.subject));
        }
        None
    }

    fn meetings_in_scope(&self, scope: ConflictScope) -> Vec<(ScheduleMeeting, SectionId)> {
        let mut rows: Vec<(ScheduleMeeting, SectionId)> = self
            .meetings
            .values()
            .filter_map(|m| {
                let (s, section, _) = self.meeting_scope(m)?;
                (s == scope).then(|| (m.clone(), section))
            })
            .collect();
        rows.sort_by_key(|(m, _)| m.id.value());
        rows
    }

    fn record(&self, id: MeetingId) -> RepositoryResult<MeetingRecord> {
        let meeting = self.meetings.get(&id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("no meeting with id {id}"),
                ErrorContext::new("get_meeting")
                    .with_entity("meeting")
                    .with_entity_id(id),
            )
        })?;
        let (scope, section, subject) = self.meeting_scope(meeting).ok_or_else(|| {
            RepositoryError::internal(format!("meeting {id} has a dangling entry reference"))
        })?;
        Ok(MeetingRecord {
            meeting: meeting.clone(),
            subject,
            section,
            scope,
            version: self.scope_version(scope)?,
        })
    }
}

/// Pairwise invariant backstop: does any new row collide with an existing
/// or another new row on a shared resource? Only pairs involving a new row
/// are checked. Returns a description of the first violation.
fn violation_against(
    existing: &[(ScheduleMeeting, SectionId)],
    new_rows: &[(ScheduleMeeting, SectionId)],
) -> Option<String> {
    let collide = |(a, sec_a): &(ScheduleMeeting, SectionId),
                   (b, sec_b): &(ScheduleMeeting, SectionId)| {
        if a.day != b.day || !a.slot.overlaps(&b.slot) {
            return None;
        }
        if a.room == b.room {
            return Some(format!("room {} double-booked on {} {}", a.room, a.day, a.slot));
        }
        if a.instructor.is_some() && a.instructor == b.instructor {
            return Some(format!(
                "instructor {} double-booked on {} {}",
                a.instructor.map(|i| i.value()).unwrap_or_default(),
                a.day,
                a.slot
            ));
        }
        if sec_a == sec_b {
            return Some(format!("section {} double-booked on {} {}", sec_a, a.day, a.slot));
        }
        None
    };

    for (i, new_row) in new_rows.iter().enumerate() {
        for old_row in existing {
            if let Some(found) = collide(new_row, old_row) {
                return Some(found);
            }
        }
        for other in new_rows.iter().skip(i + 1) {
            if let Some(found) = collide(new_row, other) {
                return Some(found);
            }
        }
    }
    None
}

fn group_not_found(id: GroupId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("no schedule group with id {id}"),
        ErrorContext::default().with_entity("group").with_entity_id(id),
    )
}

fn draft_not_found(id: DraftId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("no draft with id {id}"),
        ErrorContext::default().with_entity("draft").with_entity_id(id),
    )
}

/// In-memory implementation of [`TimetableRepository`].
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn create_group(
        &self,
        department: &str,
        school_year: &str,
        semester: Semester,
    ) -> RepositoryResult<ScheduleGroup> {
        let mut store = self.store.write();
        let id = GroupId::new(store.alloc());
        let group = ScheduleGroup {
            id,
            department: department.to_string(),
            school_year: school_year.to_string(),
            semester,
            version: 0,
        };
        store.groups.insert(id, group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: GroupId) -> RepositoryResult<ScheduleGroup> {
        let store = self.store.read();
        store.groups.get(&id).cloned().ok_or_else(|| group_not_found(id))
    }

    async fn list_groups(&self) -> RepositoryResult<Vec<ScheduleGroup>> {
        let store = self.store.read();
        let mut groups: Vec<ScheduleGroup> = store.groups.values().cloned().collect();
        groups.sort_by_key(|g| g.id.value());
        Ok(groups)
    }

    async fn confirm_group(
        &self,
        group: GroupId,
        expected_version: u64,
    ) -> RepositoryResult<usize> {
        let mut store = self.store.write();
        store.check_version(ConflictScope::Group(group), expected_version, "confirm_group")?;
        let mut confirmed = 0;
        for entry in store.entries.values_mut() {
            if entry.group == group && entry.status == EntryStatus::Planned {
                entry.status = EntryStatus::Confirmed;
                confirmed += 1;
            }
        }
        store.bump_version(ConflictScope::Group(group));
        Ok(confirmed)
    }

    async fn put_catalog(&self, catalog: &Catalog) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store.catalog = catalog.clone();
        Ok(())
    }

    async fn get_catalog(&self) -> RepositoryResult<Catalog> {
        Ok(self.store.read().catalog.clone())
    }

    async fn snapshot(
        &self,
        scope: ConflictScope,
        reference: Option<ReferenceGroupId>,
    ) -> RepositoryResult<TimetableSnapshot> {
        let store = self.store.read();
        let version = store.scope_version(scope)?;
        let references = match reference {
            Some(id) => {
                if !store.reference_groups.contains_key(&id) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("no reference group with id {id}"),
                        ErrorContext::new("snapshot")
                            .with_entity("reference_group")
                            .with_entity_id(id),
                    ));
                }
                store
                    .references
                    .iter()
                    .filter(|r| r.group == id)
                    .cloned()
                    .collect()
            }
            None => Vec::new(),
        };
        Ok(TimetableSnapshot {
            scope,
            version,
            meetings: store.meetings_in_scope(scope),
            references,
            catalog: store.catalog.clone(),
        })
    }

    async fn list_entries(&self, group: GroupId) -> RepositoryResult<Vec<EntryWithMeetings>> {
        let store = self.store.read();
        if !store.groups.contains_key(&group) {
            return Err(group_not_found(group));
        }
        let mut result: Vec<EntryWithMeetings> = store
            .entries
            .values()
            .filter(|e| e.group == group)
            .map(|entry| {
                let mut meetings: Vec<ScheduleMeeting> = store
                    .meetings
                    .values()
                    .filter(|m| m.entry == entry.id)
                    .cloned()
                    .collect();
                meetings.sort_by_key(|m| m.id.value());
                EntryWithMeetings {
                    entry: entry.clone(),
                    meetings,
                }
            })
            .collect();
        result.sort_by_key(|e| e.entry.id.value());
        Ok(result)
    }

    async fn get_meeting(&self, id: MeetingId) -> RepositoryResult<MeetingRecord> {
        self.store.read().record(id)
    }

    async fn find_meetings(
        &self,
        locator: &MeetingLocator,
    ) -> RepositoryResult<Vec<MeetingRecord>> {
        let store = self.store.read();
        if !store.groups.contains_key(&locator.group) {
            return Err(group_not_found(locator.group));
        }

        let mut records = Vec::new();
        for entry in store.entries.values() {
            if entry.group != locator.group {
                continue;
            }
            let subject_matches = store
                .catalog
                .subject(entry.subject)
                .map(|s| s.code.eq_ignore_ascii_case(&locator.subject_code))
                .unwrap_or(false);
            let section_matches = store
                .catalog
                .section(entry.section)
                .map(|s| s.code.eq_ignore_ascii_case(&locator.section_code))
                .unwrap_or(false);
            if !subject_matches || !section_matches {
                continue;
            }
            for meeting in store.meetings.values() {
                if meeting.entry != entry.id {
                    continue;
                }
                if let Some(day) = locator.day {
                    if meeting.day != day {
                        continue;
                    }
                }
                if let Some(start) = locator.start {
                    if meeting.slot.start() != start {
                        continue;
                    }
                }
                records.push(store.record(meeting.id)?);
            }
        }
        records.sort_by_key(|r| r.meeting.id.value());
        Ok(records)
    }

    async fn commit_generation(
        &self,
        group: GroupId,
        expected_version: u64,
        batch: GenerationBatch,
    ) -> RepositoryResult<CommittedBatch> {
        let mut store = self.store.write();
        let scope = ConflictScope::Group(group);
        store.check_version(scope, expected_version, "commit_generation")?;

        // Entry uniqueness: one (group, subject, section) offering, across
        // the stored entries and within the batch.
        let mut keys: Vec<(crate::api::SubjectId, SectionId)> = store
            .entries
            .values()
            .filter(|e| e.group == group)
            .map(|e| (e.subject, e.section))
            .collect();
        for placement in &batch.placements {
            let key = (placement.subject, placement.section);
            if keys.contains(&key) {
                return Err(RepositoryError::validation_with_context(
                    format!(
                        "duplicate offering: subject {} section {} already scheduled in group {group}",
                        placement.subject, placement.section
                    ),
                    ErrorContext::new("commit_generation").with_entity("entry"),
                ));
            }
            keys.push(key);
        }

        // Invariant backstop before anything is written.
        let existing = store.meetings_in_scope(scope);
        let mut staged = Vec::new();
        for placement in &batch.placements {
            for planned in &placement.meetings {
                staged.push((
                    ScheduleMeeting {
                        id: MeetingId::new(0),
                        entry: EntryId::new(0),
                        instructor: planned.instructor,
                        room: planned.room,
                        day: planned.day,
                        slot: planned.slot,
                        kind: planned.kind,
                    },
                    placement.section,
                ));
            }
        }
        if let Some(found) = violation_against(&existing, &staged) {
            return Err(RepositoryError::validation_with_context(
                format!("generation batch violates scheduling invariants: {found}"),
                ErrorContext::new("commit_generation").with_entity("meeting"),
            ));
        }

        let mut entries = Vec::new();
        let mut meetings = Vec::new();
        for placement in &batch.placements {
            let entry_id = EntryId::new(store.alloc());
            let entry = ScheduleEntry {
                id: entry_id,
                group,
                subject: placement.subject,
                section: placement.section,
                status: EntryStatus::Planned,
            };
            store.entries.insert(entry_id, entry.clone());
            entries.push(entry);
            for planned in &placement.meetings {
                let meeting_id = MeetingId::new(store.alloc());
                let meeting = ScheduleMeeting {
                    id: meeting_id,
                    entry: entry_id,
                    instructor: planned.instructor,
                    room: planned.room,
                    day: planned.day,
                    slot: planned.slot,
                    kind: planned.kind,
                };
                store.meetings.insert(meeting_id, meeting.clone());
                meetings.push(meeting);
            }
        }
        store.bump_version(scope);
        Ok(CommittedBatch { entries, meetings })
    }

    async fn commit_meeting_update(
        &self,
        id: MeetingId,
        update: MeetingUpdate,
        expected_version: u64,
    ) -> RepositoryResult<ScheduleMeeting> {
        let mut store = self.store.write();
        let record = store.record(id)?;
        store.check_version(record.scope, expected_version, "commit_meeting_update")?;

        let room = store.catalog.room(update.room).ok_or_else(|| {
            RepositoryError::validation_with_context(
                format!("unknown room {}", update.room),
                ErrorContext::new("commit_meeting_update").with_entity("room"),
            )
        })?;
        if record.meeting.kind == MeetingType::Lab && !room.lab {
            return Err(RepositoryError::validation_with_context(
                format!("room {} is not a lab room", update.room),
                ErrorContext::new("commit_meeting_update").with_entity("room"),
            ));
        }

        let updated = ScheduleMeeting {
            id,
            entry: record.meeting.entry,
            instructor: update.instructor,
            room: update.room,
            day: update.day,
            slot: update.slot,
            kind: record.meeting.kind,
        };

        // Backstop: the update must leave the scope conflict-free.
        let others: Vec<(ScheduleMeeting, SectionId)> = store
            .meetings_in_scope(record.scope)
            .into_iter()
            .filter(|(m, _)| m.id != id)
            .collect();
        let staged = vec![(updated.clone(), record.section)];
        if let Some(found) = violation_against(&others, &staged) {
            return Err(RepositoryError::validation_with_context(
                format!("update violates scheduling invariants: {found}"),
                ErrorContext::new("commit_meeting_update")
                    .with_entity("meeting")
                    .with_entity_id(id),
            ));
        }

        store.meetings.insert(id, updated.clone());
        store.bump_version(record.scope);
        Ok(updated)
    }

    async fn create_draft(&self, group: GroupId, name: &str) -> RepositoryResult<Draft> {
        let mut store = self.store.write();
        if !store.groups.contains_key(&group) {
            return Err(group_not_found(group));
        }
        let id = DraftId::new(store.alloc());
        let draft = Draft {
            id,
            group,
            name: name.to_string(),
            version: 0,
        };
        store.drafts.insert(id, draft.clone());
        Ok(draft)
    }

    async fn copy_group_to_draft(&self, group: GroupId, name: &str) -> RepositoryResult<Draft> {
        let mut store = self.store.write();
        if !store.groups.contains_key(&group) {
            return Err(group_not_found(group));
        }
        let draft_id = DraftId::new(store.alloc());
        let draft = Draft {
            id: draft_id,
            group,
            name: name.to_string(),
            version: 0,
        };
        store.drafts.insert(draft_id, draft.clone());

        let source_entries: Vec<ScheduleEntry> = store
            .entries
            .values()
            .filter(|e| e.group == group)
            .cloned()
            .collect();
        for entry in source_entries {
            let source_meetings: Vec<ScheduleMeeting> = store
                .meetings
                .values()
                .filter(|m| m.entry == entry.id)
                .cloned()
                .collect();
            let draft_entry_id = EntryId::new(store.alloc());
            store.draft_entries.insert(
                draft_entry_id,
                DraftEntry {
                    id: draft_entry_id,
                    draft: draft_id,
                    subject: entry.subject,
                    section: entry.section,
                    instructor: source_meetings.first().and_then(|m| m.instructor),
                },
            );
            for meeting in source_meetings {
                let meeting_id = MeetingId::new(store.alloc());
                store.meetings.insert(
                    meeting_id,
                    ScheduleMeeting {
                        id: meeting_id,
                        entry: draft_entry_id,
                        ..meeting
                    },
                );
            }
        }
        Ok(draft)
    }

    async fn list_drafts(&self, group: GroupId) -> RepositoryResult<Vec<Draft>> {
        let store = self.store.read();
        if !store.groups.contains_key(&group) {
            return Err(group_not_found(group));
        }
        let mut drafts: Vec<Draft> = store
            .drafts
            .values()
            .filter(|d| d.group == group)
            .cloned()
            .collect();
        drafts.sort_by_key(|d| d.id.value());
        Ok(drafts)
    }

    async fn discard_draft(&self, draft: DraftId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if store.drafts.remove(&draft).is_none() {
            return Err(draft_not_found(draft));
        }
        let entry_ids: Vec<EntryId> = store
            .draft_entries
            .values()
            .filter(|e| e.draft == draft)
            .map(|e| e.id)
            .collect();
        store.draft_entries.retain(|_, e| e.draft != draft);
        store.meetings.retain(|_, m| !entry_ids.contains(&m.entry));
        Ok(())
    }

    async fn add_reference_group(
        &self,
        school_year: &str,
        education_level: &str,
        year_level: u8,
    ) -> RepositoryResult<ReferenceGroup> {
        let mut store = self.store.write();
        let id = ReferenceGroupId::new(store.alloc());
        let group = ReferenceGroup {
            id,
            school_year: school_year.to_string(),
            education_level: education_level.to_string(),
            year_level,
        };
        store.reference_groups.insert(id, group.clone());
        Ok(group)
    }

    async fn add_references(
        &self,
        group: ReferenceGroupId,
        rows: Vec<Reference>,
    ) -> RepositoryResult<usize> {
        let mut store = self.store.write();
        if !store.reference_groups.contains_key(&group) {
            return Err(RepositoryError::not_found_with_context(
                format!("no reference group with id {group}"),
                ErrorContext::new("add_references")
                    .with_entity("reference_group")
                    .with_entity_id(group),
            ));
        }
        let mut stored = 0;
        for mut row in rows {
            row.group = group;
            store.references.push(row);
            stored += 1;
        }
        Ok(stored)
    }

    async fn list_reference_groups(&self) -> RepositoryResult<Vec<ReferenceGroup>> {
        let store = self.store.read();
        let mut groups: Vec<ReferenceGroup> = store.reference_groups.values().cloned().collect();
        groups.sort_by_key(|g| g.id.value());
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Placement, PlannedMeeting};
    use crate::models::day::Weekday;
    use crate::models::time::TimeSlot;

    fn placement(subject: i64, section: i64, day: Weekday, start: &str, end: &str) -> Placement {
        Placement {
            subject: crate::api::SubjectId::new(subject),
            section: SectionId::new(section),
            meetings: vec![PlannedMeeting {
                kind: MeetingType::Lecture,
                instructor: Some(crate::api::InstructorId::new(100)),
                room: crate::api::RoomId::new(200),
                day,
                slot: TimeSlot::from_hhmm(start, end).unwrap(),
            }],
        }
    }

    #[tokio::test]
    async fn test_commit_generation_bumps_version() {
        let repo = LocalRepository::new();
        let group = repo.create_group("CCS", "2025-2026", Semester::First).await.unwrap();
        assert_eq!(group.version, 0);

        let batch = GenerationBatch {
            placements: vec![placement(1, 10, Weekday::Mon, "08:00", "10:00")],
        };
        let committed = repo.commit_generation(group.id, 0, batch).await.unwrap();
        assert_eq!(committed.entries.len(), 1);
        assert_eq!(committed.meetings.len(), 1);
        assert_eq!(repo.get_group(group.id).await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected_and_retryable() {
        let repo = LocalRepository::new();
        let group = repo.create_group("CCS", "2025-2026", Semester::First).await.unwrap();
        let batch = GenerationBatch {
            placements: vec![placement(1, 10, Weekday::Mon, "08:00", "10:00")],
        };
        repo.commit_generation(group.id, 0, batch).await.unwrap();

        let stale = GenerationBatch {
            placements: vec![placement(2, 11, Weekday::Tue, "08:00", "10:00")],
        };
        let err = repo.commit_generation(group.id, 0, stale).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, RepositoryError::VersionConflict { .. }));
    }

    #[tokio::test]
    async fn test_conflicting_batch_never_reaches_storage() {
        let repo = LocalRepository::new();
        let group = repo.create_group("CCS", "2025-2026", Semester::First).await.unwrap();
        let batch = GenerationBatch {
            placements: vec![
                placement(1, 10, Weekday::Mon, "08:00", "10:00"),
                placement(2, 11, Weekday::Mon, "09:00", "11:00"), // same room
            ],
        };
        let err = repo.commit_generation(group.id, 0, batch).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        // Nothing was written.
        assert!(repo.list_entries(group.id).await.unwrap().is_empty());
        assert_eq!(repo.get_group(group.id).await.unwrap().version, 0);
    }

    #[tokio::test]
    async fn test_duplicate_offering_rejected() {
        let repo = LocalRepository::new();
        let group = repo.create_group("CCS", "2025-2026", Semester::First).await.unwrap();
        let batch = GenerationBatch {
            placements: vec![placement(1, 10, Weekday::Mon, "08:00", "10:00")],
        };
        repo.commit_generation(group.id, 0, batch).await.unwrap();

        let duplicate = GenerationBatch {
            placements: vec![placement(1, 10, Weekday::Tue, "08:00", "10:00")],
        };
        let err = repo.commit_generation(group.id, 1, duplicate).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_copy_group_to_draft_isolates_scopes() {
        let repo = LocalRepository::new();
        let group = repo.create_group("CCS", "2025-2026", Semester::First).await.unwrap();
        let batch = GenerationBatch {
            placements: vec![placement(1, 10, Weekday::Mon, "08:00", "10:00")],
        };
        repo.commit_generation(group.id, 0, batch).await.unwrap();

        let draft = repo.copy_group_to_draft(group.id, "what-if").await.unwrap();
        let group_snapshot = repo
            .snapshot(ConflictScope::Group(group.id), None)
            .await
            .unwrap();
        let draft_snapshot = repo
            .snapshot(ConflictScope::Draft(draft.id), None)
            .await
            .unwrap();
        assert_eq!(group_snapshot.meetings.len(), 1);
        assert_eq!(draft_snapshot.meetings.len(), 1);
        assert_ne!(
            group_snapshot.meetings[0].0.id,
            draft_snapshot.meetings[0].0.id
        );

        repo.discard_draft(draft.id).await.unwrap();
        let group_snapshot = repo
            .snapshot(ConflictScope::Group(group.id), None)
            .await
            .unwrap();
        assert_eq!(group_snapshot.meetings.len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_group_flips_planned_entries() {
        let repo = LocalRepository::new();
        let group = repo.create_group("CCS", "2025-2026", Semester::First).await.unwrap();
        let batch = GenerationBatch {
            placements: vec![placement(1, 10, Weekday::Mon, "08:00", "10:00")],
        };
        repo.commit_generation(group.id, 0, batch).await.unwrap();

        let confirmed = repo.confirm_group(group.id, 1).await.unwrap();
        assert_eq!(confirmed, 1);
        let entries = repo.list_entries(group.id).await.unwrap();
        assert_eq!(entries[0].entry.status, EntryStatus::Confirmed);
    }
}
