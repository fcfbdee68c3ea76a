#![cfg(feature = "gui")]

//! Integration tests for screen state transitions that run without a GUI
//! runtime (tasks are constructed but never executed).
//!
//! Tests cover:
//! - Dropping a stale cached identifier when its record no longer exists
//! - The status view staying recoverable when no identifier is known

mod common;

use common::*;
use visawiz::config::Config;
use visawiz::gui::screens::Screen;
use visawiz::gui::screens::status::{StatusMessage, StatusScreen};
use visawiz::gui::screens::step_form::{FormMode, StepFormMessage, StepFormScreen};
use visawiz::gui::state::AppState;

fn test_state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("failed to create temp directory");
    let config = Config {
        // Never contacted; tasks are dropped, not run
        api_base_url: "http://127.0.0.1:9".to_string(),
        cache_path: dir.path().join("progress.json"),
        ..Config::default()
    };
    (AppState::new(config), dir)
}

#[tokio::test]
async fn test_not_found_record_drops_stale_identifier() -> anyhow::Result<()> {
    // 1. Cached progress pointing at a record the backend has since dropped
    let (mut state, _dir) = test_state();
    state.wizard = wizard_with(&[Step::ApplicantDetails]);
    state.cache.save(&state.wizard).await?;

    // 2. Entering step one kicks off the record fetch
    let (mut screen, _task) = StepFormScreen::enter(Step::first(), FormMode::Create, &mut state);
    assert_eq!(state.wizard.form_id.as_deref(), Some(TEST_ID));

    // 3. The fetch resolves to not-found: the identifier is gone, so the
    //    fresh form must create a new application rather than post to the
    //    dead one
    let _task = screen.update(StepFormMessage::Fetched(FetchOutcome::NotFound), &mut state);
    assert_eq!(state.wizard.form_id, None);
    assert!(state.wizard.completed.is_empty());

    // 4. The on-disk cache is gone too, so a restart stays clean
    assert_eq!(state.cache.load(), WizardState::default());

    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_keeps_identifier() -> anyhow::Result<()> {
    // A transient failure must not destroy progress
    let (mut state, _dir) = test_state();
    state.wizard = wizard_with(&[Step::ApplicantDetails]);

    let (mut screen, _task) = StepFormScreen::enter(Step::first(), FormMode::Create, &mut state);
    let _task = screen.update(
        StepFormMessage::Fetched(FetchOutcome::Failed("connection refused".to_string())),
        &mut state,
    );
    assert_eq!(state.wizard.form_id.as_deref(), Some(TEST_ID));

    Ok(())
}

#[tokio::test]
async fn test_status_without_identifier_stays_in_error() -> anyhow::Result<()> {
    // 1. Status view entered with nothing: no return parameters, no cache
    let (mut state, _dir) = test_state();
    let (mut screen, _task) = StatusScreen::enter(ReturnParams::default(), &mut state);
    assert_eq!(screen.phase(), Phase::Error);

    // 2. A retry has nothing to fetch; the phase must not reset to a
    //    pending spinner nothing will ever resolve
    let _task = screen.update(StatusMessage::Retry, &mut state);
    assert_eq!(screen.phase(), Phase::Error);

    Ok(())
}
