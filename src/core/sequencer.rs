use tracing::debug;

use crate::api::ApiError;
use crate::core::wizard::{Step, WizardState};
use crate::models::ApplicationRecord;

/// Outcome of fetching the application record for a screen.
///
/// "Not found" is deliberately separated from other failures: it means the
/// identifier has no record yet (no progress), while anything else is a
/// fault that sends the user back to the start.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Ok(ApplicationRecord),
    NotFound,
    Failed(String),
}

impl FetchOutcome {
    pub fn from_result(result: Result<ApplicationRecord, ApiError>) -> Self {
        match result {
            Ok(record) => FetchOutcome::Ok(record),
            Err(e) if e.is_not_found() => FetchOutcome::NotFound,
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

/// What a step screen should do, given the current step, the fetched record
/// and the cached progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Render the step's fresh creation form.
    ShowCreate,
    /// The step already has data; show its update variant instead.
    ShowUpdate,
    /// Progress is missing further back; go to that step.
    Redirect(Step),
    /// Payment has gone through; nothing left to edit.
    ShowPaymentStatus,
    /// Record fetch still in flight.
    Loading,
}

/// Decide the render path for a step.
///
/// `fetched` is `None` while the record fetch is still in flight. With no
/// cached identifier the fetch never happens and only step one may render a
/// fresh form.
pub fn decide(step: Step, fetched: Option<&FetchOutcome>, wizard: &WizardState) -> Decision {
    let decision = decide_inner(step, fetched, wizard);
    debug!(step = step.slug(), ?decision, "sequencer decision");
    decision
}

fn decide_inner(step: Step, fetched: Option<&FetchOutcome>, wizard: &WizardState) -> Decision {
    if wizard.form_id.is_none() {
        return if step == Step::first() {
            Decision::ShowCreate
        } else {
            Decision::Redirect(Step::first())
        };
    }

    let record = match fetched {
        None => return Decision::Loading,
        Some(FetchOutcome::Failed(_)) => return Decision::Redirect(Step::first()),
        Some(FetchOutcome::NotFound) => {
            // No record behind the cached identifier: same as no progress.
            return if step == Step::first() {
                Decision::ShowCreate
            } else {
                Decision::Redirect(Step::first())
            };
        }
        Some(FetchOutcome::Ok(record)) => record,
    };

    if record.paid {
        return Decision::ShowPaymentStatus;
    }

    if let Some(previous) = step.previous() {
        if !record.has_step(previous) {
            return Decision::Redirect(previous);
        }
    }

    if record.has_step(step) {
        return Decision::ShowUpdate;
    }

    Decision::ShowCreate
}
