//! Integration tests for payment resolution and status polling.
//!
//! Tests cover:
//! - Session verification after the provider redirect
//! - The cancel flag and failed verification
//! - The single automatic re-check when no session reference exists
//! - Generation counters discarding stale timers
//! - The bounded status poll budget and the manual fallback

mod common;

use std::time::Duration;

use common::*;

const RECHECK: Duration = Duration::from_secs(5);
const POLL: Duration = Duration::from_secs(6);

fn resolver(params: ReturnParams) -> PaymentResolver {
    PaymentResolver::new(params, RECHECK)
}

#[test]
fn test_entry_always_starts_with_a_record_fetch() {
    let mut resolver = resolver(ReturnParams {
        success: true,
        ..ReturnParams::default()
    });
    assert_eq!(resolver.begin(), Effect::FetchRecord);
    assert_eq!(resolver.phase(), Phase::Pending);
}

#[test]
fn test_paid_record_wins_regardless_of_flags() {
    // Even a cancel redirect resolves to success if the record says paid
    let mut resolver = resolver(ReturnParams {
        cancel: true,
        ..ReturnParams::default()
    });
    resolver.begin();
    assert_eq!(resolver.on_record(true), Effect::None);
    assert_eq!(resolver.phase(), Phase::Success);
}

#[test]
fn test_session_reference_triggers_verification() {
    let mut resolver = resolver(ReturnParams {
        success: true,
        session_id: Some("cs_42".to_string()),
        ..ReturnParams::default()
    });
    resolver.begin();

    // 1. Unpaid record with a session in hand: verify it
    assert_eq!(
        resolver.on_record(false),
        Effect::VerifySession("cs_42".to_string())
    );
    assert_eq!(resolver.phase(), Phase::Verifying);

    // 2. Confirmed: success, plus exactly one re-fetch for fresh data
    assert_eq!(resolver.on_verification(Ok(true)), Effect::FetchRecord);
    assert_eq!(resolver.phase(), Phase::Success);

    // 3. The re-fetched record must not restart anything
    assert_eq!(resolver.on_record(true), Effect::None);
    assert_eq!(resolver.on_record(false), Effect::None);
    assert_eq!(resolver.phase(), Phase::Success);
}

#[test]
fn test_failed_verification_is_terminal_until_retry() {
    let mut resolver = resolver(ReturnParams {
        session_id: Some("cs_42".to_string()),
        ..ReturnParams::default()
    });
    resolver.begin();
    resolver.on_record(false);

    assert_eq!(resolver.on_verification(Ok(false)), Effect::None);
    assert_eq!(resolver.phase(), Phase::Failed);
}

#[test]
fn test_verification_error_lands_in_error_phase() {
    let mut resolver = resolver(ReturnParams {
        session_id: Some("cs_42".to_string()),
        ..ReturnParams::default()
    });
    resolver.begin();
    resolver.on_record(false);

    assert_eq!(
        resolver.on_verification(Err("timeout".to_string())),
        Effect::None
    );
    assert_eq!(resolver.phase(), Phase::Error);
}

#[test]
fn test_cancel_flag_without_paid_record_fails() {
    let mut resolver = resolver(ReturnParams {
        cancel: true,
        session_id: Some("cs_42".to_string()),
        ..ReturnParams::default()
    });
    resolver.begin();

    // Cancel outranks the session reference
    assert_eq!(resolver.on_record(false), Effect::None);
    assert_eq!(resolver.phase(), Phase::Failed);
}

#[test]
fn test_exactly_one_automatic_recheck_without_session() {
    let mut resolver = resolver(ReturnParams {
        success: true,
        ..ReturnParams::default()
    });
    resolver.begin();

    // 1. No session to verify: wait and schedule the one re-check
    let effect = resolver.on_record(false);
    let generation = match effect {
        Effect::ScheduleRecheck { delay, generation } => {
            assert_eq!(delay, RECHECK);
            generation
        }
        other => panic!("expected a scheduled re-check, got {other:?}"),
    };
    assert_eq!(resolver.phase(), Phase::Waiting);

    // 2. The re-check elapses and fetches again
    assert_eq!(resolver.on_recheck_due(generation), Effect::FetchRecord);

    // 3. Still unpaid: no second automatic re-check
    assert_eq!(resolver.on_record(false), Effect::None);
    assert_eq!(resolver.phase(), Phase::Waiting);
}

#[test]
fn test_stale_recheck_generation_is_dropped() {
    let mut resolver = resolver(ReturnParams::default());
    resolver.begin();
    let generation = match resolver.on_record(false) {
        Effect::ScheduleRecheck { generation, .. } => generation,
        other => panic!("expected a scheduled re-check, got {other:?}"),
    };

    // A retry bumps the generation; the old timer must do nothing
    resolver.retry();
    assert_eq!(resolver.on_recheck_due(generation), Effect::None);
}

#[test]
fn test_retry_restarts_from_a_fresh_fetch() {
    let mut resolver = resolver(ReturnParams {
        session_id: Some("cs_42".to_string()),
        ..ReturnParams::default()
    });
    resolver.begin();
    resolver.on_record(false);
    resolver.on_verification(Err("timeout".to_string()));
    assert_eq!(resolver.phase(), Phase::Error);

    assert_eq!(resolver.retry(), Effect::FetchRecord);
    assert_eq!(resolver.phase(), Phase::Pending);
}

#[test]
fn test_poll_budget_is_bounded() {
    let mut poller = StatusPoller::new(2, POLL);
    assert!(!poller.exhausted());

    // 1. First unpaid record: poll scheduled
    let first = match poller.on_unpaid() {
        Effect::SchedulePoll { delay, generation } => {
            assert_eq!(delay, POLL);
            generation
        }
        other => panic!("expected a scheduled poll, got {other:?}"),
    };
    assert_eq!(poller.on_poll_due(first), Effect::FetchRecord);

    // 2. Second unpaid record: last automatic poll
    let second = match poller.on_unpaid() {
        Effect::SchedulePoll { generation, .. } => generation,
        other => panic!("expected a scheduled poll, got {other:?}"),
    };
    assert_eq!(poller.on_poll_due(second), Effect::FetchRecord);

    // 3. Budget spent: manual checking only
    assert!(poller.exhausted());
    assert_eq!(poller.on_unpaid(), Effect::None);
    assert_eq!(poller.manual_check(), Effect::FetchRecord);
}

#[test]
fn test_manual_check_cancels_pending_poll() {
    let mut poller = StatusPoller::new(2, POLL);
    let generation = match poller.on_unpaid() {
        Effect::SchedulePoll { generation, .. } => generation,
        other => panic!("expected a scheduled poll, got {other:?}"),
    };

    // Manual check bumps the generation; the scheduled poll is now stale
    assert_eq!(poller.manual_check(), Effect::FetchRecord);
    assert_eq!(poller.on_poll_due(generation), Effect::None);
}

#[test]
fn test_return_params_parsing() {
    let params = ReturnParams::from_url(
        "https://localhost/return?success=true&cancel=false&orderId=app-9&session_id=cs_1",
    );
    assert!(params.success);
    assert!(!params.cancel);
    assert_eq!(params.order_id.as_deref(), Some("app-9"));
    assert_eq!(params.session_id.as_deref(), Some("cs_1"));

    // Bare query strings and missing parameters fall back to defaults
    let params = ReturnParams::from_url("cancel=true");
    assert!(params.cancel);
    assert!(!params.success);
    assert_eq!(params.order_id, None);
    assert_eq!(params.session_id, None);
}
