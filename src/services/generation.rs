//! Generation orchestration: snapshot, plan, commit, retry.

use crate::api::{GenerationOutcome, GroupId};
use crate::conflict::ConflictScope;
use crate::db::repository::{GenerationBatch, TimetableRepository};
use crate::engine::{self, EngineConfig, EngineInput};
use crate::error::{TimetableError, TimetableResult};
use crate::models::demand::GenerationRequest;

/// Run one generation cycle for a group and persist the result.
///
/// The engine plans against a consistent snapshot of the group (optionally
/// unioned with a reference timetable); the plan is committed atomically
/// under the snapshot's version token. When a concurrent commit lands in
/// between, the whole cycle is retried against a fresh snapshot, up to
/// `config.commit_retries` times.
pub async fn generate_schedule(
    repository: &dyn TimetableRepository,
    group: GroupId,
    request: &GenerationRequest,
    config: &EngineConfig,
) -> TimetableResult<GenerationOutcome> {
    // The request carries the authoritative resource pools; store them so
    // locator and suggestion lookups resolve against the same catalog.
    repository.put_catalog(&request.catalog).await?;

    let attempts = config.commit_retries.max(1);
    for attempt in 1..=attempts {
        let snapshot = repository
            .snapshot(ConflictScope::Group(group), request.reference)
            .await?;
        let mut index = snapshot.build_index();

        let input = EngineInput {
            demands: &request.demands,
            catalog: &request.catalog,
            filters: &request.filters,
        };
        let plan = engine::generate(&mut index, &input, config);
        log::info!(
            "generation for group {}: {}/{} demands placed, {} candidates tried, {} backtracks",
            group,
            plan.stats.placed,
            plan.stats.demands,
            plan.stats.candidates_tried,
            plan.stats.backtracks
        );

        let batch = GenerationBatch {
            placements: plan.placements.clone(),
        };
        match repository
            .commit_generation(group, snapshot.version, batch)
            .await
        {
            Ok(committed) => {
                return Ok(GenerationOutcome {
                    entries: committed.entries,
                    meetings: committed.meetings,
                    unsatisfied: plan.unsatisfied,
                    stats: plan.stats,
                })
            }
            Err(e) if e.is_retryable() && attempt < attempts => {
                log::warn!(
                    "generation commit for group {} lost a version race (attempt {}/{}), replanning",
                    group,
                    attempt,
                    attempts
                );
            }
            Err(e) if e.is_retryable() => {
                return Err(TimetableError::ConcurrentModification { attempts })
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(TimetableError::ConcurrentModification { attempts })
}
