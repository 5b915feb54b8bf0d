//! Business-logic layer: orchestration over the repository trait.
//!
//! Each submodule holds free functions that take `&dyn TimetableRepository`,
//! so the same logic runs against any backend. The read-plan-commit cycles
//! live here: services take a snapshot, work against it in memory and hand
//! the result to an atomic versioned commit, retrying when a concurrent
//! commit invalidates the read.

pub mod edits;
pub mod generation;
pub mod suggest;

pub use edits::{apply_edit, revalidate_scope, update_by_locator, validate_edit, EditProposal};
pub use generation::generate_schedule;
pub use suggest::{suggest_for_demand, suggest_for_meeting, SearchWindow};
