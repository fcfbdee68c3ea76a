use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The wizard steps, in the order the applicant walks through them.
///
/// The declaration order is the wizard order; `Ord` on this enum is the
/// step ordering the sequencer relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ApplicantDetails,
    PassportDetails,
    ContactDetails,
    TravelDetails,
    Background,
    Documents,
    Photo,
    Terms,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::ApplicantDetails,
        Step::PassportDetails,
        Step::ContactDetails,
        Step::TravelDetails,
        Step::Background,
        Step::Documents,
        Step::Photo,
        Step::Terms,
    ];

    pub fn first() -> Step {
        Step::ApplicantDetails
    }

    /// 1-based step number, for display.
    pub fn number(self) -> usize {
        Step::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    pub fn previous(self) -> Option<Step> {
        let index = Step::ALL.iter().position(|s| *s == self)?;
        index.checked_sub(1).map(|i| Step::ALL[i])
    }

    pub fn next(self) -> Option<Step> {
        let index = Step::ALL.iter().position(|s| *s == self)?;
        Step::ALL.get(index + 1).copied()
    }

    /// Path segment used by the backend for this step's endpoints.
    pub fn slug(self) -> &'static str {
        match self {
            Step::ApplicantDetails => "applicant_details",
            Step::PassportDetails => "passport_details",
            Step::ContactDetails => "contact_details",
            Step::TravelDetails => "travel_details",
            Step::Background => "background",
            Step::Documents => "documents",
            Step::Photo => "photo",
            Step::Terms => "terms",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::ApplicantDetails => "Applicant details",
            Step::PassportDetails => "Passport details",
            Step::ContactDetails => "Contact details",
            Step::TravelDetails => "Travel details",
            Step::Background => "Background declarations",
            Step::Documents => "Supporting documents",
            Step::Photo => "Photo",
            Step::Terms => "Terms & conditions",
        }
    }
}

/// Locally cached wizard progress: the in-progress application identifier
/// plus a step-name → completed map.
///
/// This state is not authoritative. The backend record is the source of
/// truth; the two are re-synced by re-fetching the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub form_id: Option<String>,
    #[serde(default)]
    pub completed: HashMap<Step, bool>,
}

/// The only way wizard state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    SetFormId(String),
    SetStepCompleted(Step),
    SetStepsCompleted(Vec<Step>),
    Clear,
}

/// Pure reducer over wizard state.
pub fn reduce(state: &WizardState, action: WizardAction) -> WizardState {
    let mut next = state.clone();
    match action {
        WizardAction::SetFormId(id) => {
            next.form_id = Some(id);
        }
        WizardAction::SetStepCompleted(step) => {
            next.completed.insert(step, true);
        }
        WizardAction::SetStepsCompleted(steps) => {
            for step in steps {
                next.completed.insert(step, true);
            }
        }
        WizardAction::Clear => {
            next = WizardState::default();
        }
    }
    next
}

impl WizardState {
    pub fn apply(&mut self, action: WizardAction) {
        *self = reduce(self, action);
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed.get(&step).copied().unwrap_or(false)
    }

    /// The step to land on when the app starts: the first step not yet
    /// marked complete, or the last step once everything is done.
    pub fn resume_step(&self) -> Step {
        if self.form_id.is_none() {
            return Step::first();
        }
        Step::ALL
            .into_iter()
            .find(|step| !self.is_completed(*step))
            .unwrap_or(Step::Terms)
    }
}
