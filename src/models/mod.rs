pub mod day;
pub mod demand;
pub mod macros;
pub mod schedule;
pub mod time;

pub use day::{parse_combined_days, DaySet, Weekday};
pub use demand::{Demand, GenerationRequest, MeetingRequirement, PlacementFilters, TimeBand};
pub use schedule::{
    Catalog, Draft, DraftEntry, EmploymentType, EntryStatus, Instructor, MeetingType, Reference,
    ReferenceGroup, Room, ScheduleEntry, ScheduleGroup, ScheduleMeeting, Section, Semester,
    Subject,
};
pub use time::TimeSlot;
