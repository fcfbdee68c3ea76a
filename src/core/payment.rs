use std::time::Duration;

use tracing::{debug, info, warn};

/// Query parameters the checkout provider appends when it sends the user
/// back: `success`, `cancel`, `orderId`, `session_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnParams {
    pub success: bool,
    pub cancel: bool,
    pub order_id: Option<String>,
    pub session_id: Option<String>,
}

impl ReturnParams {
    /// Parse the provider's return URL. Unknown parameters are ignored;
    /// missing ones fall back to the defaults.
    pub fn from_url(url: &str) -> Self {
        let mut params = ReturnParams::default();
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or(url);
        for pair in query.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };
            match key {
                "success" => params.success = value == "true",
                "cancel" => params.cancel = value == "true",
                "orderId" if !value.is_empty() => params.order_id = Some(value.to_string()),
                "session_id" if !value.is_empty() => {
                    params.session_id = Some(value.to_string());
                }
                _ => {}
            }
        }
        params
    }
}

/// Resolver phase, `Pending → Verifying | Waiting → Success | Failed | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Verifying,
    Waiting,
    Success,
    Failed,
    Error,
}

/// Side effect the caller must run after feeding the resolver or poller an
/// event. Scheduled effects carry the generation that produced them; a tick
/// delivered with a stale generation is discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchRecord,
    VerifySession(String),
    ScheduleRecheck { delay: Duration, generation: u64 },
    SchedulePoll { delay: Duration, generation: u64 },
}

/// State machine reconciling payment status after the provider redirect.
///
/// Driven entirely by events; owns no timers and makes no calls itself, so
/// it can be tested without a runtime. Schedules at most one automatic
/// re-check per entry; everything beyond that is user-initiated.
#[derive(Debug, Clone)]
pub struct PaymentResolver {
    params: ReturnParams,
    phase: Phase,
    recheck_delay: Duration,
    recheck_scheduled: bool,
    generation: u64,
}

impl PaymentResolver {
    pub fn new(params: ReturnParams, recheck_delay: Duration) -> Self {
        Self {
            params,
            phase: Phase::Pending,
            recheck_delay,
            recheck_scheduled: false,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> &ReturnParams {
        &self.params
    }

    /// Entry point: the resolver always starts from a fresh record fetch.
    pub fn begin(&mut self) -> Effect {
        self.phase = Phase::Pending;
        Effect::FetchRecord
    }

    /// Feed in the paid flag of a freshly fetched record.
    pub fn on_record(&mut self, paid: bool) -> Effect {
        if self.phase == Phase::Success {
            return Effect::None;
        }
        if paid {
            info!("payment confirmed by application record");
            self.phase = Phase::Success;
            return Effect::None;
        }
        if self.params.cancel {
            self.phase = Phase::Failed;
            return Effect::None;
        }
        if let Some(session) = self.params.session_id.clone() {
            self.phase = Phase::Verifying;
            return Effect::VerifySession(session);
        }
        // No session reference to verify against: the webhook may simply not
        // have landed yet. One automatic re-check, then the user takes over.
        self.phase = Phase::Waiting;
        if self.recheck_scheduled {
            return Effect::None;
        }
        self.recheck_scheduled = true;
        debug!(delay = ?self.recheck_delay, "scheduling payment re-check");
        Effect::ScheduleRecheck {
            delay: self.recheck_delay,
            generation: self.generation,
        }
    }

    /// The record fetch itself failed.
    pub fn on_record_error(&mut self, message: &str) -> Effect {
        if self.phase != Phase::Success {
            warn!(error = message, "record fetch failed while resolving payment");
            self.phase = Phase::Error;
        }
        Effect::None
    }

    /// A scheduled re-check elapsed. Stale generations are ignored.
    pub fn on_recheck_due(&mut self, generation: u64) -> Effect {
        if generation != self.generation || self.phase != Phase::Waiting {
            return Effect::None;
        }
        Effect::FetchRecord
    }

    /// Result of the verification endpoint. A confirmed payment triggers
    /// exactly one record re-fetch so the confirmation view shows fresh data.
    pub fn on_verification(&mut self, outcome: Result<bool, String>) -> Effect {
        match outcome {
            Ok(true) => {
                info!("payment verified");
                self.phase = Phase::Success;
                Effect::FetchRecord
            }
            Ok(false) => {
                self.phase = Phase::Failed;
                Effect::None
            }
            Err(message) => {
                warn!(error = message, "payment verification errored");
                self.phase = Phase::Error;
                Effect::None
            }
        }
    }

    /// Manual retry from `Failed`/`Error`: re-run the whole resolution.
    /// Bumping the generation invalidates any re-check still in flight.
    pub fn retry(&mut self) -> Effect {
        self.generation += 1;
        self.begin()
    }
}

/// Bounded automatic polling of the application record on the status view,
/// with a manual fallback once the budget is spent.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    retries_left: u8,
    interval: Duration,
    generation: u64,
}

impl StatusPoller {
    pub fn new(retries: u8, interval: Duration) -> Self {
        Self {
            retries_left: retries,
            interval,
            generation: 0,
        }
    }

    /// Automatic retries exhausted; the view should expose manual checking.
    pub fn exhausted(&self) -> bool {
        self.retries_left == 0
    }

    /// The record came back unpaid: schedule the next automatic poll, if
    /// any budget remains.
    pub fn on_unpaid(&mut self) -> Effect {
        if self.retries_left == 0 {
            return Effect::None;
        }
        self.retries_left -= 1;
        debug!(remaining = self.retries_left, "scheduling status poll");
        Effect::SchedulePoll {
            delay: self.interval,
            generation: self.generation,
        }
    }

    /// A scheduled poll elapsed. Stale generations are ignored.
    pub fn on_poll_due(&self, generation: u64) -> Effect {
        if generation != self.generation {
            return Effect::None;
        }
        Effect::FetchRecord
    }

    /// User-initiated "check status": always a single fetch, and cancels
    /// whatever automatic poll might still be pending.
    pub fn manual_check(&mut self) -> Effect {
        self.generation += 1;
        Effect::FetchRecord
    }
}
