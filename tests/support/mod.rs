//! Shared fixtures for integration tests.
//!
//! Not every suite uses every helper.
#![allow(dead_code)]

use cts_rust::api::{GroupId, InstructorId, RoomId, SectionId, SubjectId};
use cts_rust::db::repository::{GenerationBatch, TimetableRepository};
use cts_rust::db::LocalRepository;
use cts_rust::engine::{Placement, PlannedMeeting};
use cts_rust::models::{
    Catalog, EmploymentType, Instructor, MeetingType, Room, ScheduleGroup, Section, Semester,
    Subject, TimeSlot, Weekday,
};

/// A catalog with `instructors` instructors (ids 100..), `rooms` rooms
/// (ids 200.., the first one a lab), four subjects (ids 1..=4) and two
/// sections (ids 10, 11).
pub fn catalog(instructors: usize, rooms: usize) -> Catalog {
    Catalog {
        subjects: vec![
            subject(1, "CS101", "Intro to Computing"),
            subject(2, "CS102", "Programming 1"),
            subject(3, "CS103", "Discrete Structures"),
            subject(4, "CS104", "Data Structures"),
        ],
        sections: vec![
            Section::from_code(SectionId::new(10), "CCS", "BSIT-1A").unwrap(),
            Section::from_code(SectionId::new(11), "CCS", "BSIT-1B").unwrap(),
        ],
        instructors: (0..instructors)
            .map(|n| Instructor {
                id: InstructorId::new(100 + n as i64),
                name: format!("Instructor {n}"),
                employment: EmploymentType::FullTime,
                active: true,
            })
            .collect(),
        rooms: (0..rooms)
            .map(|n| Room {
                id: RoomId::new(200 + n as i64),
                name: format!("R-30{n}"),
                building: "Main".into(),
                floor: 3,
                capacity: 40,
                lab: n == 0,
            })
            .collect(),
    }
}

fn subject(id: i64, code: &str, description: &str) -> Subject {
    Subject {
        id: SubjectId::new(id),
        code: code.into(),
        description: description.into(),
        units: 3,
    }
}

pub fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::from_hhmm(start, end).unwrap()
}

pub fn lecture(
    subject: i64,
    section: i64,
    instructor: i64,
    room: i64,
    day: Weekday,
    start: &str,
    end: &str,
) -> Placement {
    Placement {
        subject: SubjectId::new(subject),
        section: SectionId::new(section),
        meetings: vec![PlannedMeeting {
            kind: MeetingType::Lecture,
            instructor: Some(InstructorId::new(instructor)),
            room: RoomId::new(room),
            day,
            slot: slot(start, end),
        }],
    }
}

/// A repository holding one group with a small committed timetable:
///
/// - CS101 / BSIT-1A, instructor 100, room 201, Mon 08:00-10:00
/// - CS102 / BSIT-1A, instructor 101, room 202, Mon 10:00-12:00
/// - CS103 / BSIT-1B, instructor 100, room 201, Tue 10:00-12:00
pub async fn seeded_repository() -> (LocalRepository, ScheduleGroup) {
    let repo = LocalRepository::new();
    repo.put_catalog(&catalog(3, 3)).await.unwrap();
    let group = repo
        .create_group("CCS", "2025-2026", Semester::First)
        .await
        .unwrap();
    let batch = GenerationBatch {
        placements: vec![
            lecture(1, 10, 100, 201, Weekday::Mon, "08:00", "10:00"),
            lecture(2, 10, 101, 202, Weekday::Mon, "10:00", "12:00"),
            lecture(3, 11, 100, 201, Weekday::Tue, "10:00", "12:00"),
        ],
    };
    repo.commit_generation(group.id, group.version, batch)
        .await
        .unwrap();
    let group = repo.get_group(group.id).await.unwrap();
    (repo, group)
}

/// Meeting id of the committed meeting for (subject, section) in a group.
pub async fn meeting_id_for(
    repo: &LocalRepository,
    group: GroupId,
    subject: i64,
    section: i64,
) -> cts_rust::api::MeetingId {
    let entries = repo.list_entries(group).await.unwrap();
    entries
        .iter()
        .find(|e| {
            e.entry.subject == SubjectId::new(subject) && e.entry.section == SectionId::new(section)
        })
        .and_then(|e| e.meetings.first())
        .map(|m| m.id)
        .expect("seeded meeting missing")
}
