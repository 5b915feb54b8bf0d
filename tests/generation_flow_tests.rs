//! End-to-end generation runs through the service layer.

mod support;

use cts_rust::api::{SectionId, SubjectId};
use cts_rust::conflict::ConflictScope;
use cts_rust::db::repository::{RepositoryError, TimetableRepository};
use cts_rust::db::LocalRepository;
use cts_rust::engine::EngineConfig;
use cts_rust::error::TimetableError;
use cts_rust::models::{
    Demand, GenerationRequest, MeetingRequirement, MeetingType, PlacementFilters, Semester,
};
use cts_rust::services::{generate_schedule, revalidate_scope};

use support::{catalog, slot};

fn demand(subject: i64, section: i64, requirements: Vec<MeetingRequirement>) -> Demand {
    Demand {
        subject: SubjectId::new(subject),
        section: SectionId::new(section),
        requirements,
    }
}

fn lecture_hours(hours: u32) -> Vec<MeetingRequirement> {
    vec![MeetingRequirement {
        kind: MeetingType::Lecture,
        hours,
    }]
}

#[tokio::test]
async fn test_full_generation_run_commits_conflict_free_timetable() {
    let repo = LocalRepository::new();
    let group = repo
        .create_group("CCS", "2025-2026", Semester::First)
        .await
        .unwrap();

    let request = GenerationRequest {
        demands: vec![
            demand(1, 10, lecture_hours(2)),
            demand(2, 10, lecture_hours(3)),
            demand(3, 11, lecture_hours(2)),
            demand(
                4,
                11,
                vec![
                    MeetingRequirement {
                        kind: MeetingType::Lecture,
                        hours: 2,
                    },
                    MeetingRequirement {
                        kind: MeetingType::Lab,
                        hours: 3,
                    },
                ],
            ),
        ],
        catalog: catalog(3, 3),
        filters: PlacementFilters::default(),
        reference: None,
    };

    let outcome = generate_schedule(&repo, group.id, &request, &EngineConfig::default())
        .await
        .unwrap();

    assert!(outcome.unsatisfied.is_empty());
    assert_eq!(outcome.entries.len(), 4);
    assert_eq!(outcome.meetings.len(), 5);
    assert_eq!(outcome.stats.placed, 4);

    // The committed timetable is conflict-free.
    let hits = revalidate_scope(&repo, ConflictScope::Group(group.id))
        .await
        .unwrap();
    assert!(hits.is_empty());

    // And actually persisted.
    let entries = repo.list_entries(group.id).await.unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(repo.get_group(group.id).await.unwrap().version, 1);
}

#[tokio::test]
async fn test_generation_respects_reference_timetable() {
    let repo = LocalRepository::new();
    let group = repo
        .create_group("CCS", "2025-2026", Semester::First)
        .await
        .unwrap();

    // One room, one instructor; a reference schedule occupies that room
    // every class day until 10:00.
    let catalog = catalog(1, 1);
    let reference_group = repo
        .add_reference_group("2025-2026", "college", 1)
        .await
        .unwrap();
    repo.add_references(
        reference_group.id,
        vec![cts_rust::models::Reference {
            group: reference_group.id,
            description: "shared building block".to_string(),
            instructor: None,
            room: Some(catalog.rooms[0].id),
            section: None,
            days: "MondayTuesdayWednesdayThursdayFridaySaturday".to_string(),
            slot: slot("07:00", "10:00"),
        }],
    )
    .await
    .unwrap();

    let request = GenerationRequest {
        demands: vec![demand(1, 10, lecture_hours(2))],
        catalog,
        filters: PlacementFilters::default(),
        reference: Some(reference_group.id),
    };

    let outcome = generate_schedule(&repo, group.id, &request, &EngineConfig::default())
        .await
        .unwrap();
    assert_eq!(outcome.meetings.len(), 1);
    assert!(outcome.meetings[0].slot.start() >= chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap());
}

#[tokio::test]
async fn test_unplaceable_demand_is_reported_not_dropped() {
    let repo = LocalRepository::new();
    let group = repo
        .create_group("CCS", "2025-2026", Semester::First)
        .await
        .unwrap();

    let mut catalog = catalog(1, 1);
    catalog.rooms[0].lab = false;
    let request = GenerationRequest {
        demands: vec![demand(
            1,
            10,
            vec![MeetingRequirement {
                kind: MeetingType::Lab,
                hours: 3,
            }],
        )],
        catalog,
        filters: PlacementFilters::default(),
        reference: None,
    };

    let outcome = generate_schedule(&repo, group.id, &request, &EngineConfig::default())
        .await
        .unwrap();
    assert!(outcome.entries.is_empty());
    assert_eq!(outcome.unsatisfied.len(), 1);
    assert_eq!(outcome.unsatisfied[0].reason, "no lab room available");
    // The run still commits (an empty batch) and reports honestly.
    assert_eq!(outcome.stats.demands, 1);
    assert_eq!(outcome.stats.placed, 0);
}

#[tokio::test]
async fn test_regenerating_same_offerings_is_rejected() {
    let repo = LocalRepository::new();
    let group = repo
        .create_group("CCS", "2025-2026", Semester::First)
        .await
        .unwrap();

    let request = GenerationRequest {
        demands: vec![demand(1, 10, lecture_hours(2))],
        catalog: catalog(2, 2),
        filters: PlacementFilters::default(),
        reference: None,
    };
    generate_schedule(&repo, group.id, &request, &EngineConfig::default())
        .await
        .unwrap();

    // A second run for the same (subject, section) violates offering
    // uniqueness and is rejected at commit, leaving the first run intact.
    let err = generate_schedule(&repo, group.id, &request, &EngineConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TimetableError::Repository(RepositoryError::ValidationError { .. })
    ));
    assert_eq!(repo.list_entries(group.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_generation_for_unknown_group_fails() {
    let repo = LocalRepository::new();
    let request = GenerationRequest {
        demands: vec![demand(1, 10, lecture_hours(2))],
        catalog: catalog(1, 1),
        filters: PlacementFilters::default(),
        reference: None,
    };
    let err = generate_schedule(
        &repo,
        cts_rust::api::GroupId::new(404),
        &request,
        &EngineConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        TimetableError::Repository(RepositoryError::NotFound { .. })
    ));
}
