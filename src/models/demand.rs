//! Generation inputs: demands, preference filters and JSON ingestion.
//!
//! The upload/parsing collaborator delivers a demand list plus resource
//! pools as one JSON document; this module deserializes and sanity-checks
//! that payload before it reaches the engine.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::api::{InstructorId, ReferenceGroupId, SectionId, SubjectId};
use crate::models::day::Weekday;
use crate::models::schedule::{Catalog, EmploymentType, MeetingType};

/// One weekly meeting block a demand requires, e.g. a 2-hour lecture or a
/// 3-hour lab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequirement {
    pub kind: MeetingType,
    /// Weekly hours for this block, scheduled contiguously.
    pub hours: u32,
}

/// One (subject, section) offering to place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demand {
    pub subject: SubjectId,
    pub section: SectionId,
    pub requirements: Vec<MeetingRequirement>,
}

/// Allowed time-of-day window for candidate starts.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TimeBand {
    pub earliest: NaiveTime,
    pub latest: NaiveTime,
}

/// Request-scoped preference filters. These are plain key-value filters that
/// narrow candidate generation; they are not part of the hard-constraint
/// set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementFilters {
    /// Restrict candidate instructors to this set
    #[serde(default)]
    pub instructors: Option<Vec<InstructorId>>,
    /// Restrict candidate instructors to one employment type
    #[serde(default)]
    pub employment: Option<EmploymentType>,
    /// Restrict candidate days to this set
    #[serde(default)]
    pub days: Option<Vec<Weekday>>,
    /// Restrict candidate start times to this band
    #[serde(default)]
    pub time_band: Option<TimeBand>,
}

/// Full inbound payload for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub demands: Vec<Demand>,
    pub catalog: Catalog,
    #[serde(default)]
    pub filters: PlacementFilters,
    /// Opt-in cross-check against an externally supplied reference timetable
    #[serde(default)]
    pub reference: Option<ReferenceGroupId>,
}

/// Parse a generation request from a JSON string.
///
/// Deserializes with Serde, then verifies that every demand resolves against
/// the supplied catalog and carries at least one meeting requirement, so the
/// engine never has to guard against dangling ids.
pub fn parse_generation_request_json_str(json: &str) -> Result<GenerationRequest> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("Invalid generation request JSON")?;
    if value.as_object().and_then(|obj| obj.get("demands")).is_none() {
        anyhow::bail!("Missing required 'demands' field");
    }

    let request: GenerationRequest = serde_json::from_value(value)
        .context("Failed to deserialize generation request using Serde")?;

    for demand in &request.demands {
        if request.catalog.subject(demand.subject).is_none() {
            anyhow::bail!("Demand references unknown subject {}", demand.subject);
        }
        if request.catalog.section(demand.section).is_none() {
            anyhow::bail!("Demand references unknown section {}", demand.section);
        }
        if demand.requirements.is_empty() {
            anyhow::bail!(
                "Demand for subject {} section {} has no meeting requirements",
                demand.subject,
                demand.section
            );
        }
        if demand.requirements.iter().any(|r| r.hours == 0 || r.hours > 8) {
            anyhow::bail!(
                "Demand for subject {} section {} has an out-of-range block length",
                demand.subject,
                demand.section
            );
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_REQUEST: &str = r#"{
        "demands": [
            { "subject": 1, "section": 10, "requirements": [ { "kind": "lecture", "hours": 2 } ] }
        ],
        "catalog": {
            "subjects": [
                { "id": 1, "code": "CS101", "description": "Intro to Computing", "units": 3 }
            ],
            "sections": [
                { "id": 10, "department": "CCS", "code": "BSIT-1A", "year_level": 1, "block": "A" }
            ],
            "instructors": [
                { "id": 100, "name": "A. Cruz", "employment": "full_time", "active": true }
            ],
            "rooms": [
                { "id": 200, "name": "R-301", "building": "Main", "floor": 3, "capacity": 40, "lab": false }
            ]
        }
    }"#;

    #[test]
    fn test_parse_minimal_request() {
        let request = parse_generation_request_json_str(MINIMAL_REQUEST).unwrap();
        assert_eq!(request.demands.len(), 1);
        assert_eq!(request.catalog.rooms.len(), 1);
        assert!(request.filters.instructors.is_none());
        assert!(request.reference.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_demands_key() {
        let result = parse_generation_request_json_str(r#"{"catalog": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_generation_request_json_str("not valid json {").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_subject() {
        let json = MINIMAL_REQUEST.replace("\"subject\": 1", "\"subject\": 99");
        let result = parse_generation_request_json_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_empty_requirements() {
        let json = MINIMAL_REQUEST.replace(
            "[ { \"kind\": \"lecture\", \"hours\": 2 } ]",
            "[]",
        );
        assert!(parse_generation_request_json_str(&json).is_err());
    }
}
