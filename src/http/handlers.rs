//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AlternativesQuery, AlternativesResponse, ConfirmResponse, CreateDraftRequest,
    CreateGroupRequest, DraftListResponse, GroupListResponse, HealthResponse,
    LocatorUpdateRequest, ReferenceUploadRequest, ReferenceUploadResponse, TimetableResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{GenerationOutcome, GroupId, MeetingId};
use crate::conflict::ConflictScope;
use crate::models::demand::parse_generation_request_json_str;
use crate::models::schedule::{Draft, ScheduleGroup, ScheduleMeeting};
use crate::models::time::TimeSlot;
use crate::services::{self, EditProposal, SearchWindow};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Schedule groups
// =============================================================================

/// POST /v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ScheduleGroup>), AppError> {
    let group = state
        .repository
        .create_group(&request.department, &request.school_year, request.semester)
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /v1/groups
pub async fn list_groups(State(state): State<AppState>) -> HandlerResult<GroupListResponse> {
    let groups = state.repository.list_groups().await?;
    let total = groups.len();
    Ok(Json(GroupListResponse { groups, total }))
}

/// GET /v1/groups/{group_id}/timetable
pub async fn get_timetable(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> HandlerResult<TimetableResponse> {
    let group_id = GroupId::new(group_id);
    let group = state.repository.get_group(group_id).await?;
    let entries = state.repository.list_entries(group_id).await?;
    Ok(Json(TimetableResponse { group, entries }))
}

/// POST /v1/groups/{group_id}/generate
///
/// Run one generation cycle: demands plus resource pools in, committed
/// placements plus an unsatisfied-demand report out.
pub async fn generate(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> HandlerResult<GenerationOutcome> {
    let payload = serde_json::to_string(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid generation request: {}", e)))?;
    let request = parse_generation_request_json_str(&payload)
        .map_err(|e| AppError::BadRequest(format!("{:#}", e)))?;

    let outcome = services::generate_schedule(
        state.repository.as_ref(),
        GroupId::new(group_id),
        &request,
        &state.engine,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /v1/groups/{group_id}/confirm
///
/// Confirm every planned entry of the group. Fails closed with the full
/// conflict list if the stored timetable violates the hard constraints.
pub async fn confirm_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> HandlerResult<ConfirmResponse> {
    let group_id = GroupId::new(group_id);
    let hits =
        services::revalidate_scope(state.repository.as_ref(), ConflictScope::Group(group_id))
            .await?;
    if !hits.is_empty() {
        return Err(AppError::Conflict {
            code: "RESOURCE_CONFLICT",
            message: format!("timetable has {} conflicting meeting(s)", hits.len()),
            details: serde_json::to_value(&hits).ok(),
        });
    }

    let group = state.repository.get_group(group_id).await?;
    let confirmed = state
        .repository
        .confirm_group(group_id, group.version)
        .await?;
    Ok(Json(ConfirmResponse { confirmed }))
}

// =============================================================================
// Drafts
// =============================================================================

/// POST /v1/groups/{group_id}/drafts
pub async fn create_draft(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(request): Json<CreateDraftRequest>,
) -> Result<(StatusCode, Json<Draft>), AppError> {
    let group_id = GroupId::new(group_id);
    let draft = if request.copy_timetable {
        state
            .repository
            .copy_group_to_draft(group_id, &request.name)
            .await?
    } else {
        state.repository.create_draft(group_id, &request.name).await?
    };
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /v1/groups/{group_id}/drafts
pub async fn list_drafts(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> HandlerResult<DraftListResponse> {
    let drafts = state.repository.list_drafts(GroupId::new(group_id)).await?;
    let total = drafts.len();
    Ok(Json(DraftListResponse { drafts, total }))
}

// =============================================================================
// Meetings
// =============================================================================

/// POST /v1/meetings/{meeting_id}/validate
///
/// Conflict-check an edit without committing anything.
pub async fn validate_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
    Json(proposal): Json<EditProposal>,
) -> HandlerResult<crate::api::EditOutcome> {
    let outcome =
        services::validate_edit(state.repository.as_ref(), MeetingId::new(meeting_id), &proposal)
            .await?;
    Ok(Json(outcome))
}

/// PUT /v1/meetings/{meeting_id}
pub async fn update_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
    Json(proposal): Json<EditProposal>,
) -> HandlerResult<ScheduleMeeting> {
    let updated =
        services::apply_edit(state.repository.as_ref(), MeetingId::new(meeting_id), &proposal)
            .await?;
    Ok(Json(updated))
}

/// PUT /v1/meetings
///
/// Update a meeting addressed by natural key (group, subject code, section
/// code, optional day/start). The locator must match exactly one meeting.
pub async fn update_meeting_by_locator(
    State(state): State<AppState>,
    Json(request): Json<LocatorUpdateRequest>,
) -> HandlerResult<ScheduleMeeting> {
    let updated = services::update_by_locator(
        state.repository.as_ref(),
        &request.locator,
        &request.proposal,
    )
    .await?;
    Ok(Json(updated))
}

/// GET /v1/meetings/{meeting_id}/alternatives
pub async fn get_alternatives(
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
    Query(query): Query<AlternativesQuery>,
) -> HandlerResult<AlternativesResponse> {
    let slot = TimeSlot::from_hhmm(&query.start, &query.end)?;
    let mut window = SearchWindow::default();
    if let Some(radius) = query.radius_minutes {
        window.time_radius_minutes = radius;
    }
    if let Some(limit) = query.limit {
        window.limit = limit;
    }

    let alternatives = services::suggest_for_meeting(
        state.repository.as_ref(),
        MeetingId::new(meeting_id),
        &query.day,
        slot,
        &window,
    )
    .await?;
    let total = alternatives.len();
    Ok(Json(AlternativesResponse {
        alternatives,
        total,
    }))
}

// =============================================================================
// Reference timetables
// =============================================================================

/// POST /v1/references
///
/// Store an externally supplied reference timetable for later opt-in
/// conflict checks.
pub async fn upload_references(
    State(state): State<AppState>,
    Json(request): Json<ReferenceUploadRequest>,
) -> Result<(StatusCode, Json<ReferenceUploadResponse>), AppError> {
    let group = state
        .repository
        .add_reference_group(
            &request.school_year,
            &request.education_level,
            request.year_level,
        )
        .await?;

    let mut rows = Vec::with_capacity(request.rows.len());
    for row in request.rows {
        rows.push(row.into_reference(group.id)?);
    }
    let stored_rows = state.repository.add_references(group.id, rows).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReferenceUploadResponse { group, stored_rows }),
    ))
}
