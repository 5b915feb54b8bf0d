//! Schedule entities: groups, reference data, entries, meetings, drafts and
//! externally supplied reference timetables.
//!
//! The atomic conflict-checkable unit is the [`ScheduleMeeting`]: one entry
//! (a subject/section offering) may own several meetings on different days,
//! rooms or instructors, so conflict queries never operate at entry
//! granularity.

use serde::{Deserialize, Serialize};

use crate::api::{
    DraftId, EntryId, GroupId, InstructorId, MeetingId, ReferenceGroupId, RoomId, SectionId,
    SubjectId,
};
use crate::error::TimetableError;
use crate::models::day::Weekday;
use crate::models::time::TimeSlot;

/// Academic semester within a school year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    First,
    Second,
    Summer,
}

/// One timetable instance for a (department, school-year, semester).
/// Multiple groups may coexist for the same department/semester as versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleGroup {
    pub id: GroupId,
    pub department: String,
    pub school_year: String,
    pub semester: Semester,
    /// Optimistic-concurrency token, bumped on every committed mutation.
    pub version: u64,
}

/// Lifecycle status of a schedule entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Planned,
    Confirmed,
}

/// Meeting type; lab meetings require a lab-flagged room.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Lecture,
    Lab,
}

/// Instructor employment type, used by preference filters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
}

/// Immutable subject reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub code: String,
    pub description: String,
    pub units: u8,
}

/// A cohort of students. Year level and block are parsed once from the
/// section code at construction and stored as structured fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub department: String,
    pub code: String,
    pub year_level: u8,
    pub block: char,
}

impl Section {
    /// Build a section from a structured code such as `"BSIT-3A"`.
    ///
    /// The code must end with one or two year-level digits followed by a
    /// single block letter. Malformed codes fail closed with
    /// [`TimetableError::InvalidSectionCode`].
    pub fn from_code(
        id: SectionId,
        department: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<Self, TimetableError> {
        let code = code.into();
        let malformed = || TimetableError::InvalidSectionCode { code: code.clone() };

        let mut chars = code.chars().rev();
        let block = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(malformed()),
        };

        let digits: String = chars
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if digits.is_empty() || digits.len() > 2 {
            return Err(malformed());
        }
        let year_level: u8 = digits.parse().map_err(|_| malformed())?;
        if year_level == 0 {
            return Err(malformed());
        }

        Ok(Self {
            id,
            department: department.into(),
            code,
            year_level,
            block,
        })
    }
}

/// An instructor; a resource type subject to conflict constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    pub employment: EmploymentType,
    pub active: bool,
}

/// A room; a resource type subject to conflict constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub building: String,
    pub floor: u8,
    pub capacity: u32,
    pub lab: bool,
}

/// One (group, subject, section) assignment; a logical course offering.
/// Owns 1..N meetings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub group: GroupId,
    pub subject: SubjectId,
    pub section: SectionId,
    pub status: EntryStatus,
}

/// One concrete weekly occurrence: the atomic conflict-checkable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMeeting {
    pub id: MeetingId,
    pub entry: EntryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<InstructorId>,
    pub room: RoomId,
    pub day: Weekday,
    pub slot: TimeSlot,
    pub kind: MeetingType,
}

/// A speculative, mutable parallel timetable scoped to one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: DraftId,
    pub group: GroupId,
    pub name: String,
    /// Optimistic-concurrency token, independent of the group's.
    pub version: u64,
}

/// A draft-scoped course offering, unique per
/// (draft, subject, instructor, section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftEntry {
    pub id: EntryId,
    pub draft: DraftId,
    pub subject: SubjectId,
    pub section: SectionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<InstructorId>,
}

/// An externally supplied timetable used purely as a conflict-check
/// baseline, never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceGroup {
    pub id: ReferenceGroupId,
    pub school_year: String,
    pub education_level: String,
    pub year_level: u8,
}

/// One reference meeting row. Resource ids are optional: the upload
/// collaborator maps names to known ids where it can, and unmapped resources
/// simply cannot collide. The `days` token is kept raw (possibly combined,
/// e.g. `"MonSat"`) and expanded at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub group: ReferenceGroupId,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<InstructorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionId>,
    pub days: String,
    pub slot: TimeSlot,
}

/// Reference data pools the engine draws from. Supplied inbound by the
/// upload/parsing collaborator; ids are assigned by that collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
    pub sections: Vec<Section>,
    pub instructors: Vec<Instructor>,
    pub rooms: Vec<Room>,
}

impl Catalog {
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn instructor(&self, id: InstructorId) -> Option<&Instructor> {
        self.instructors.iter().find(|i| i.id == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_from_code_parses_year_and_block() {
        let section = Section::from_code(SectionId::new(1), "CCS", "BSIT-3A").unwrap();
        assert_eq!(section.year_level, 3);
        assert_eq!(section.block, 'A');
        assert_eq!(section.code, "BSIT-3A");
    }

    #[test]
    fn test_section_from_code_lowercase_block() {
        let section = Section::from_code(SectionId::new(1), "CCS", "BSCS-1b").unwrap();
        assert_eq!(section.year_level, 1);
        assert_eq!(section.block, 'B');
    }

    #[test]
    fn test_section_from_code_two_digit_year() {
        let section = Section::from_code(SectionId::new(1), "SHS", "STEM-11C").unwrap();
        assert_eq!(section.year_level, 11);
        assert_eq!(section.block, 'C');
    }

    #[test]
    fn test_section_from_code_rejects_malformed() {
        assert!(Section::from_code(SectionId::new(1), "CCS", "BSIT").is_err());
        assert!(Section::from_code(SectionId::new(1), "CCS", "BSIT-A").is_err());
        assert!(Section::from_code(SectionId::new(1), "CCS", "BSIT-0A").is_err());
        assert!(Section::from_code(SectionId::new(1), "CCS", "").is_err());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog {
            subjects: vec![Subject {
                id: SubjectId::new(7),
                code: "CS101".into(),
                description: "Intro to Computing".into(),
                units: 3,
            }],
            ..Default::default()
        };
        assert_eq!(catalog.subject(SubjectId::new(7)).unwrap().code, "CS101");
        assert!(catalog.subject(SubjectId::new(8)).is_none());
    }
}
