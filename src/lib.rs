pub mod api;
pub mod config;
pub mod core;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use core::sequencer::{Decision, FetchOutcome, decide};
pub use core::wizard::{Step, WizardAction, WizardState, reduce};
pub use models::{ApplicationRecord, ApplicationStatus};

#[cfg(feature = "gui")]
pub mod gui;
