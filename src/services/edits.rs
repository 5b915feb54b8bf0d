//! Manual edit validation and application.
//!
//! Edits follow validate-then-commit: a proposal is conflict-checked
//! against a scope snapshot, and only a clean proposal reaches the
//! versioned commit. A concurrent commit between the check and the write
//! fails the version token, and the whole cycle revalidates against fresh
//! state, so a conflicting edit can never slip in through a race.

use serde::Deserialize;

use crate::api::{ConflictHit, EditOutcome, InstructorId, MeetingId, RoomId};
use crate::conflict::{ConflictQuery, ConflictScope};
use crate::db::repository::{
    MeetingLocator, MeetingRecord, MeetingUpdate, RepositoryError, TimetableRepository,
};
use crate::error::{TimetableError, TimetableResult};
use crate::models::day::{parse_combined_days, Weekday};
use crate::models::schedule::{Catalog, MeetingType, ScheduleMeeting};
use crate::models::time::TimeSlot;

const EDIT_COMMIT_RETRIES: u32 = 3;

/// A proposed replacement placement for one meeting. `room` and
/// `instructor` keep the meeting's current values when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct EditProposal {
    /// Day token; must resolve to exactly one canonical day
    pub day: String,
    pub start: chrono::NaiveTime,
    pub end: chrono::NaiveTime,
    #[serde(default)]
    pub room: Option<RoomId>,
    #[serde(default)]
    pub instructor: Option<InstructorId>,
}

/// Normalize a proposal against the targeted meeting: single canonical day,
/// validated time slot, resolved room and instructor, lab-room check.
fn resolve_proposal(
    record: &MeetingRecord,
    proposal: &EditProposal,
    catalog: &Catalog,
) -> TimetableResult<(Weekday, TimeSlot, RoomId, Option<InstructorId>)> {
    let days = parse_combined_days(&proposal.day);
    if days.len() != 1 {
        return Err(TimetableError::InvalidDayToken {
            token: proposal.day.clone(),
        });
    }
    let day = days.iter().next().unwrap_or(Weekday::Mon);

    let slot = TimeSlot::new(proposal.start, proposal.end)?;

    let room_id = proposal.room.unwrap_or(record.meeting.room);
    let room = catalog.room(room_id).ok_or_else(|| {
        TimetableError::Repository(RepositoryError::not_found(format!(
            "no room with id {room_id}"
        )))
    })?;
    if record.meeting.kind == MeetingType::Lab && !room.lab {
        return Err(TimetableError::LabRoomRequired { room: room_id });
    }

    let instructor = proposal.instructor.or(record.meeting.instructor);
    Ok((day, slot, room_id, instructor))
}

fn meeting_not_found(e: RepositoryError) -> TimetableError {
    match e {
        RepositoryError::NotFound { message, .. } => {
            TimetableError::MeetingNotFound { detail: message }
        }
        other => other.into(),
    }
}

/// Conflict-check an edit proposal without committing anything.
///
/// The meeting being moved is excluded from the check, so rescheduling a
/// meeting within its own current window never reports a self-conflict.
pub async fn validate_edit(
    repository: &dyn TimetableRepository,
    meeting: MeetingId,
    proposal: &EditProposal,
) -> TimetableResult<EditOutcome> {
    let record = repository
        .get_meeting(meeting)
        .await
        .map_err(meeting_not_found)?;
    let snapshot = repository.snapshot(record.scope, None).await?;
    let (day, slot, room, instructor) = resolve_proposal(&record, proposal, &snapshot.catalog)?;

    let index = snapshot.build_index();
    let query = ConflictQuery::new(day.as_str(), slot)
        .instructor_opt(instructor)
        .room(room)
        .section(record.section)
        .exclude(meeting);
    let conflicts = index.find_conflicts(&query);
    if conflicts.is_empty() {
        Ok(EditOutcome::clean())
    } else {
        Ok(EditOutcome::rejected(conflicts))
    }
}

/// Validate an edit and, when clean, commit it under the scope's version
/// token. A conflicting proposal fails with
/// [`TimetableError::ResourceConflict`] and changes nothing.
pub async fn apply_edit(
    repository: &dyn TimetableRepository,
    meeting: MeetingId,
    proposal: &EditProposal,
) -> TimetableResult<ScheduleMeeting> {
    for attempt in 1..=EDIT_COMMIT_RETRIES {
        let record = repository
            .get_meeting(meeting)
            .await
            .map_err(meeting_not_found)?;
        let snapshot = repository.snapshot(record.scope, None).await?;
        let (day, slot, room, instructor) =
            resolve_proposal(&record, proposal, &snapshot.catalog)?;

        let index = snapshot.build_index();
        let query = ConflictQuery::new(day.as_str(), slot)
            .instructor_opt(instructor)
            .room(room)
            .section(record.section)
            .exclude(meeting);
        let conflicts = index.find_conflicts(&query);
        if !conflicts.is_empty() {
            return Err(TimetableError::ResourceConflict { conflicts });
        }

        let update = MeetingUpdate {
            day,
            slot,
            room,
            instructor,
        };
        match repository
            .commit_meeting_update(meeting, update, snapshot.version)
            .await
        {
            Ok(updated) => return Ok(updated),
            Err(e) if e.is_retryable() && attempt < EDIT_COMMIT_RETRIES => {
                log::warn!(
                    "edit of meeting {} lost a version race (attempt {}/{}), revalidating",
                    meeting,
                    attempt,
                    EDIT_COMMIT_RETRIES
                );
            }
            Err(e) if e.is_retryable() => {
                return Err(TimetableError::ConcurrentModification {
                    attempts: EDIT_COMMIT_RETRIES,
                })
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(TimetableError::ConcurrentModification {
        attempts: EDIT_COMMIT_RETRIES,
    })
}

/// Apply an edit addressed by natural key instead of id.
///
/// The locator must resolve to exactly one meeting: zero matches fail with
/// [`TimetableError::MeetingNotFound`], several with
/// [`TimetableError::AmbiguousLocator`]. Nothing is ever guessed.
pub async fn update_by_locator(
    repository: &dyn TimetableRepository,
    locator: &MeetingLocator,
    proposal: &EditProposal,
) -> TimetableResult<ScheduleMeeting> {
    let matches = repository.find_meetings(locator).await?;
    match matches.len() {
        0 => Err(TimetableError::MeetingNotFound {
            detail: format!(
                "no meeting matches {}/{} in group {}",
                locator.subject_code, locator.section_code, locator.group
            ),
        }),
        1 => apply_edit(repository, matches[0].meeting.id, proposal).await,
        n => Err(TimetableError::AmbiguousLocator { matches: n }),
    }
}

/// Re-check every meeting of a scope against its peers.
///
/// Used before promoting a draft or confirming a group: the result should
/// be empty, and any hit names a stored pair that violates the hard
/// constraints. Each conflicting pair is reported from both sides.
pub async fn revalidate_scope(
    repository: &dyn TimetableRepository,
    scope: ConflictScope,
) -> TimetableResult<Vec<ConflictHit>> {
    let snapshot = repository.snapshot(scope, None).await?;
    let index = snapshot.build_index();

    let mut hits = Vec::new();
    for (meeting, section) in &snapshot.meetings {
        let query = ConflictQuery::new(meeting.day.as_str(), meeting.slot)
            .instructor_opt(meeting.instructor)
            .room(meeting.room)
            .section(*section)
            .exclude(meeting.id);
        hits.extend(index.find_conflicts(&query));
    }
    Ok(hits)
}
