//! Request/response DTOs for the REST API.
//!
//! Core domain types already derive Serde and go over the wire as-is; this
//! module holds only the shapes that exist purely at the HTTP boundary.

use serde::{Deserialize, Serialize};

use crate::api::{Alternative, InstructorId, RoomId, SectionId};
use crate::db::repository::{EntryWithMeetings, MeetingLocator};
use crate::models::schedule::{Draft, Reference, ReferenceGroup, ScheduleGroup, Semester};
use crate::services::EditProposal;

/// GET /health response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// POST /v1/groups request body.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub department: String,
    pub school_year: String,
    pub semester: Semester,
}

/// GET /v1/groups response.
#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<ScheduleGroup>,
    pub total: usize,
}

/// GET /v1/groups/{id}/timetable response.
#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub group: ScheduleGroup,
    pub entries: Vec<EntryWithMeetings>,
}

/// POST /v1/groups/{id}/confirm response.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub confirmed: usize,
}

/// POST /v1/groups/{id}/drafts request body.
#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    pub name: String,
    /// Pre-populate the draft with a copy of the group's timetable
    #[serde(default)]
    pub copy_timetable: bool,
}

/// GET /v1/groups/{id}/drafts response.
#[derive(Debug, Serialize)]
pub struct DraftListResponse {
    pub drafts: Vec<Draft>,
    pub total: usize,
}

/// PUT /v1/meetings request body: locator plus the proposed placement.
#[derive(Debug, Deserialize)]
pub struct LocatorUpdateRequest {
    pub locator: MeetingLocator,
    pub proposal: EditProposal,
}

/// GET /v1/meetings/{id}/alternatives query parameters.
#[derive(Debug, Deserialize)]
pub struct AlternativesQuery {
    /// Requested day token
    pub day: String,
    /// Requested start, "HH:MM"
    pub start: String,
    /// Requested end, "HH:MM"
    pub end: String,
    #[serde(default)]
    pub radius_minutes: Option<u32>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /v1/meetings/{id}/alternatives response.
#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub alternatives: Vec<Alternative>,
    pub total: usize,
}

/// One uploaded reference timetable row.
#[derive(Debug, Deserialize)]
pub struct ReferenceRowDto {
    pub description: String,
    #[serde(default)]
    pub instructor: Option<InstructorId>,
    #[serde(default)]
    pub room: Option<RoomId>,
    #[serde(default)]
    pub section: Option<SectionId>,
    /// Raw day token, possibly combined (e.g. "MonSat")
    pub days: String,
    /// "HH:MM"
    pub start: String,
    /// "HH:MM"
    pub end: String,
}

/// POST /v1/references request body.
#[derive(Debug, Deserialize)]
pub struct ReferenceUploadRequest {
    pub school_year: String,
    pub education_level: String,
    pub year_level: u8,
    pub rows: Vec<ReferenceRowDto>,
}

/// POST /v1/references response.
#[derive(Debug, Serialize)]
pub struct ReferenceUploadResponse {
    pub group: ReferenceGroup,
    pub stored_rows: usize,
}

impl ReferenceRowDto {
    /// Convert to a domain reference row for the given reference group.
    /// Fails on an invalid time range; the day token stays raw.
    pub fn into_reference(
        self,
        group: crate::api::ReferenceGroupId,
    ) -> Result<Reference, crate::error::TimetableError> {
        Ok(Reference {
            group,
            description: self.description,
            instructor: self.instructor,
            room: self.room,
            section: self.section,
            days: self.days,
            slot: crate::models::time::TimeSlot::from_hhmm(&self.start, &self.end)?,
        })
    }
}
