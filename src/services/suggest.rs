//! Alternative placement suggestion.
//!
//! When a desired placement conflicts, the suggester walks nearby
//! day/time/room/instructor combinations and returns the conflict-free ones
//! ranked by distance from the original request. An empty list is a valid
//! answer, never an error.

use crate::api::{Alternative, GroupId, InstructorId, MeetingId, RoomId, SectionId};
use crate::conflict::{ConflictIndex, ConflictQuery, ConflictScope};
use crate::db::repository::TimetableRepository;
use crate::error::{TimetableError, TimetableResult};
use crate::models::day::{parse_combined_days, Weekday};
use crate::models::schedule::{Catalog, MeetingType};
use crate::models::time::TimeSlot;

/// Weight of one day of distance, in minutes. A neighboring day counts as
/// four hours of time shift, so same-day alternatives rank first.
const DAY_DISTANCE_MINUTES: u32 = 240;

/// Bounds of the search around one requested placement.
#[derive(Debug, Clone)]
pub struct SearchWindow {
    /// Candidate days; defaults to the Mon-Sat class days
    pub days: Option<Vec<Weekday>>,
    /// How far from the requested start to scan, in minutes
    pub time_radius_minutes: u32,
    /// Candidate starts snap to this grid
    pub grid_minutes: u32,
    /// Candidate rooms; defaults to every suitable catalog room
    pub rooms: Option<Vec<RoomId>>,
    /// Substitute instructors to consider; defaults to the current one
    pub instructors: Option<Vec<InstructorId>>,
    /// Maximum number of alternatives returned
    pub limit: usize,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            days: None,
            time_radius_minutes: 180,
            grid_minutes: 30,
            rooms: None,
            instructors: None,
            limit: 10,
        }
    }
}

/// Suggest conflict-free placements near a requested window for an existing
/// meeting. The meeting itself is excluded from conflict checks, so its
/// current placement can be offered back when it is still the closest fit.
pub async fn suggest_for_meeting(
    repository: &dyn TimetableRepository,
    meeting: MeetingId,
    requested_day: &str,
    requested_slot: TimeSlot,
    window: &SearchWindow,
) -> TimetableResult<Vec<Alternative>> {
    let record = repository.get_meeting(meeting).await.map_err(|e| {
        match e {
            crate::db::repository::RepositoryError::NotFound { message, .. } => {
                TimetableError::MeetingNotFound { detail: message }
            }
            other => other.into(),
        }
    })?;
    let snapshot = repository.snapshot(record.scope, None).await?;
    let index = snapshot.build_index();

    let instructors: Vec<Option<InstructorId>> = match &window.instructors {
        Some(pool) => pool.iter().copied().map(Some).collect(),
        None => vec![record.meeting.instructor],
    };
    let rooms = room_pool(&snapshot.catalog, record.meeting.kind, window);

    collect_alternatives(
        &index,
        record.section,
        Some(meeting),
        requested_day,
        requested_slot,
        &rooms,
        &instructors,
        window,
    )
}

/// Suggest placements for a demand that has no meeting yet (typically one
/// the engine reported as unsatisfied). Checks run against the group's
/// current timetable.
pub async fn suggest_for_demand(
    repository: &dyn TimetableRepository,
    group: GroupId,
    section: SectionId,
    kind: MeetingType,
    requested_day: &str,
    requested_slot: TimeSlot,
    window: &SearchWindow,
) -> TimetableResult<Vec<Alternative>> {
    let snapshot = repository.snapshot(ConflictScope::Group(group), None).await?;
    let index = snapshot.build_index();

    let instructors: Vec<Option<InstructorId>> = match &window.instructors {
        Some(pool) => pool.iter().copied().map(Some).collect(),
        None => vec![None],
    };
    let rooms = room_pool(&snapshot.catalog, kind, window);

    collect_alternatives(
        &index,
        section,
        None,
        requested_day,
        requested_slot,
        &rooms,
        &instructors,
        window,
    )
}

fn room_pool(catalog: &Catalog, kind: MeetingType, window: &SearchWindow) -> Vec<RoomId> {
    match &window.rooms {
        Some(pool) => pool.clone(),
        None => catalog
            .rooms
            .iter()
            .filter(|r| kind != MeetingType::Lab || r.lab)
            .map(|r| r.id)
            .collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_alternatives(
    index: &ConflictIndex,
    section: SectionId,
    exclude: Option<MeetingId>,
    requested_day: &str,
    requested_slot: TimeSlot,
    rooms: &[RoomId],
    instructors: &[Option<InstructorId>],
    window: &SearchWindow,
) -> TimetableResult<Vec<Alternative>> {
    let requested = parse_combined_days(requested_day);
    if requested.len() != 1 {
        return Err(TimetableError::InvalidDayToken {
            token: requested_day.to_string(),
        });
    }
    let base_day = requested.iter().next().unwrap_or(Weekday::Mon);
    let base_start = minutes(requested_slot.start());
    let duration = requested_slot.duration_minutes();

    let days = match &window.days {
        Some(days) => days.clone(),
        None => Weekday::CLASS_DAYS.to_vec(),
    };
    let grid = window.grid_minutes.max(5);
    let radius = window.time_radius_minutes;

    let mut alternatives = Vec::new();
    for &day in &days {
        // First grid point at or after (base - radius).
        let floor = base_start.saturating_sub(radius);
        let mut start = floor.div_ceil(grid) * grid;
        while start <= base_start + radius {
            if let Some(slot) = slot_at(start, duration) {
                for &instructor in instructors {
                    for &room in rooms {
                        let mut query = ConflictQuery::new(day.as_str(), slot)
                            .instructor_opt(instructor)
                            .room(room)
                            .section(section);
                        if let Some(id) = exclude {
                            query = query.exclude(id);
                        }
                        if !index.has_conflict(&query) {
                            alternatives.push(Alternative {
                                day,
                                slot,
                                room,
                                instructor,
                                distance: day.distance(base_day) * DAY_DISTANCE_MINUTES
                                    + start.abs_diff(base_start),
                            });
                        }
                    }
                }
            }
            start += grid;
        }
    }

    alternatives.sort_by_key(|a| {
        (
            a.distance,
            a.day.index(),
            minutes(a.slot.start()),
            a.room.value(),
        )
    });
    alternatives.truncate(window.limit);
    Ok(alternatives)
}

fn minutes(t: chrono::NaiveTime) -> u32 {
    chrono::Timelike::num_seconds_from_midnight(&t) / 60
}

fn slot_at(start_minutes: u32, duration_minutes: u32) -> Option<TimeSlot> {
    let end_minutes = start_minutes + duration_minutes;
    if end_minutes >= 24 * 60 {
        return None;
    }
    let start = chrono::NaiveTime::from_hms_opt(start_minutes / 60, start_minutes % 60, 0)?;
    let end = chrono::NaiveTime::from_hms_opt(end_minutes / 60, end_minutes % 60, 0)?;
    TimeSlot::new(start, end).ok()
}
