mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from visawiz for tests
#[allow(unused_imports)]
pub use visawiz::{
    core::payment::{Effect, PaymentResolver, Phase, ReturnParams, StatusPoller},
    core::sequencer::{Decision, FetchOutcome, decide},
    core::wizard::{Step, WizardAction, WizardState, reduce},
    models::ApplicationRecord,
};
