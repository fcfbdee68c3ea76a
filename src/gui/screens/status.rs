use iced::widget::{button, column, container, row, text};
use iced::{Element, Length, Task};

use crate::core::payment::{Effect, PaymentResolver, Phase, ReturnParams, StatusPoller};
use crate::core::sequencer::FetchOutcome;
use crate::gui::screens::{Screen, ScreenMessage};
use crate::gui::{AppState, message::Route};
use crate::models::ApplicationRecord;

/// Post-payment status view. All transition logic lives in the resolver and
/// poller; this screen only turns their effects into tasks and renders the
/// current phase.
#[derive(Debug, Clone)]
pub struct StatusScreen {
    resolver: PaymentResolver,
    poller: StatusPoller,
    record: Option<ApplicationRecord>,
    application_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum StatusMessage {
    RecordFetched(FetchOutcome),
    VerifyDone(Result<bool, String>),
    RecheckDue(u64),
    PollDue(u64),
    Retry,
    CheckNow,
}

impl StatusScreen {
    pub fn enter(params: ReturnParams, state: &mut AppState) -> (Self, Task<ScreenMessage<Self>>) {
        let application_id = params
            .order_id
            .clone()
            .or_else(|| state.wizard.form_id.clone());
        let mut screen = Self {
            resolver: PaymentResolver::new(params, state.config.recheck_delay),
            poller: StatusPoller::new(state.config.poll_retries, state.config.poll_interval),
            record: None,
            application_id,
        };
        let task = if screen.application_id.is_none() {
            screen.resolver.on_record_error("no application identifier");
            Task::none()
        } else {
            let effect = screen.resolver.begin();
            screen.run_effect(effect, state)
        };
        (screen, task)
    }

    pub fn phase(&self) -> Phase {
        self.resolver.phase()
    }

    fn run_effect(&self, effect: Effect, state: &AppState) -> Task<ScreenMessage<Self>> {
        match effect {
            Effect::None => Task::none(),
            Effect::FetchRecord => {
                let Some(id) = self.application_id.clone() else {
                    return Task::none();
                };
                let api = state.api.clone();
                Task::perform(
                    async move { FetchOutcome::from_result(api.fetch_application(&id).await) },
                    |outcome| {
                        ScreenMessage::ScreenMessage(StatusMessage::RecordFetched(outcome))
                    },
                )
            }
            Effect::VerifySession(session) => {
                let api = state.api.clone();
                Task::perform(
                    async move {
                        api.verify_session(&session)
                            .await
                            .map(|outcome| outcome.paid)
                            .map_err(|e| e.to_string())
                    },
                    |result| ScreenMessage::ScreenMessage(StatusMessage::VerifyDone(result)),
                )
            }
            Effect::ScheduleRecheck { delay, generation } => Task::perform(
                async move { tokio::time::sleep(delay).await },
                move |_| ScreenMessage::ScreenMessage(StatusMessage::RecheckDue(generation)),
            ),
            Effect::SchedulePoll { delay, generation } => Task::perform(
                async move { tokio::time::sleep(delay).await },
                move |_| ScreenMessage::ScreenMessage(StatusMessage::PollDue(generation)),
            ),
        }
    }
}

impl Screen for StatusScreen {
    type Message = StatusMessage;
    type ParentMessage = Route;

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            StatusMessage::RecordFetched(outcome) => match outcome {
                FetchOutcome::Ok(record) => {
                    let paid = record.paid;
                    self.record = Some(record);
                    let resolver_effect = self.resolver.on_record(paid);
                    let poll_effect = if !paid && self.resolver.phase() == Phase::Waiting {
                        self.poller.on_unpaid()
                    } else {
                        Effect::None
                    };
                    Task::batch([
                        self.run_effect(resolver_effect, state),
                        self.run_effect(poll_effect, state),
                    ])
                }
                FetchOutcome::NotFound => {
                    let effect = self.resolver.on_record_error("application not found");
                    self.run_effect(effect, state)
                }
                FetchOutcome::Failed(message) => {
                    let effect = self.resolver.on_record_error(&message);
                    self.run_effect(effect, state)
                }
            },
            StatusMessage::VerifyDone(result) => {
                let effect = self.resolver.on_verification(result);
                self.run_effect(effect, state)
            }
            StatusMessage::RecheckDue(generation) => {
                let effect = self.resolver.on_recheck_due(generation);
                self.run_effect(effect, state)
            }
            StatusMessage::PollDue(generation) => {
                let effect = self.poller.on_poll_due(generation);
                self.run_effect(effect, state)
            }
            StatusMessage::Retry => {
                // Without an identifier a retry has nothing to fetch; leaving
                // the phase untouched keeps the error view (with its way out)
                // on screen instead of an endless spinner.
                if self.application_id.is_none() {
                    return Task::none();
                }
                let effect = self.resolver.retry();
                self.run_effect(effect, state)
            }
            StatusMessage::CheckNow => {
                let effect = self.poller.manual_check();
                self.run_effect(effect, state)
            }
        }
    }

    fn view<'a>(&'a self, _state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let content: Element<'a, ScreenMessage<Self>> = match self.resolver.phase() {
            Phase::Pending | Phase::Verifying => column![
                text("Checking your payment...").size(24),
                text("This usually takes a few seconds."),
            ]
            .spacing(12)
            .into(),
            Phase::Waiting => {
                let mut col = column![
                    text("Waiting for payment confirmation").size(24),
                    text("The provider has not confirmed your payment yet."),
                ]
                .spacing(12);
                if self.poller.exhausted() {
                    col = col.push(
                        button("Check status")
                            .on_press(ScreenMessage::ScreenMessage(StatusMessage::CheckNow)),
                    );
                } else {
                    col = col.push(text("Checking again shortly..."));
                }
                col.into()
            }
            Phase::Success => {
                let mut col = column![
                    text("Payment received").size(24),
                    text("Your visa application has been submitted."),
                ]
                .spacing(12);
                if let Some(record) = &self.record {
                    col = col.push(text(format!("Application reference: {}", record.id)));
                    col = col.push(text(format!("Status: {}", record.status.label())));
                }
                col = col.push(
                    button("Start new application")
                        .on_press(ScreenMessage::ParentMessage(Route::Restart)),
                );
                col.into()
            }
            Phase::Failed => column![
                text("Payment not completed").size(24),
                text("The payment was cancelled or declined. No fee has been charged."),
                row![
                    button("Try again")
                        .on_press(ScreenMessage::ScreenMessage(StatusMessage::Retry)),
                    button("Back to payment")
                        .on_press(ScreenMessage::ParentMessage(Route::Payment)),
                ]
                .spacing(10),
            ]
            .spacing(12)
            .into(),
            Phase::Error => {
                let actions = if self.application_id.is_some() {
                    row![
                        button("Try again")
                            .on_press(ScreenMessage::ScreenMessage(StatusMessage::Retry)),
                        button("Back to payment")
                            .on_press(ScreenMessage::ParentMessage(Route::Payment)),
                    ]
                } else {
                    // No application to re-check; the only way forward is a
                    // fresh start.
                    row![
                        button("Start new application")
                            .on_press(ScreenMessage::ParentMessage(Route::Restart)),
                    ]
                }
                .spacing(10);
                column![
                    text("Could not check your payment").size(24),
                    text("Something went wrong while contacting the server."),
                    actions,
                ]
                .spacing(12)
                .into()
            }
        };

        container(column![content].max_width(640).padding(20))
            .center_x(Length::Fill)
            .padding(30)
            .into()
    }
}
