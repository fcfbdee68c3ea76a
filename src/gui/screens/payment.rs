use std::process::Command;

use iced::widget::{button, checkbox, column, container, row, text};
use iced::{Element, Length, Task};
use tracing::{info, warn};

use crate::core::payment::ReturnParams;
use crate::core::wizard::Step;
use crate::gui::screens::step_form::FormMode;
use crate::gui::screens::{Screen, ScreenMessage};
use crate::gui::state::Notification;
use crate::gui::{AppState, message::Route};
use crate::models::CheckoutSession;

/// Hand-off to the hosted checkout page. The terms acceptance gate lives
/// here too; the pay button stays disabled until it is ticked.
#[derive(Debug, Clone)]
pub struct PaymentScreen {
    accepted: bool,
    requesting: bool,
    session: Option<CheckoutSession>,
}

#[derive(Debug, Clone)]
pub enum PaymentMessage {
    AcceptToggled(bool),
    Pay,
    SessionReady(Result<CheckoutSession, String>),
    CheckStatus,
    BackToSteps,
}

impl PaymentScreen {
    pub fn new(state: &AppState) -> Self {
        Self {
            accepted: state.wizard.is_completed(Step::Terms),
            requesting: false,
            session: None,
        }
    }
}

impl Screen for PaymentScreen {
    type Message = PaymentMessage;
    type ParentMessage = Route;

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            PaymentMessage::AcceptToggled(accepted) => {
                self.accepted = accepted;
                Task::none()
            }
            PaymentMessage::Pay => {
                let Some(id) = state.wizard.form_id.clone() else {
                    state.notification =
                        Some(Notification::failure("No application in progress."));
                    return Task::none();
                };
                self.requesting = true;
                let api = state.api.clone();
                Task::perform(
                    async move {
                        api.create_checkout_session(&id)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    |result| {
                        ScreenMessage::ScreenMessage(PaymentMessage::SessionReady(result))
                    },
                )
            }
            PaymentMessage::SessionReady(result) => {
                self.requesting = false;
                match result {
                    Ok(session) => {
                        open_checkout(&session.checkout_url);
                        self.session = Some(session);
                        Task::none()
                    }
                    Err(message) => {
                        state.notification = Some(Notification::failure(message));
                        Task::none()
                    }
                }
            }
            PaymentMessage::CheckStatus => {
                let params = ReturnParams {
                    success: false,
                    cancel: false,
                    order_id: state.wizard.form_id.clone(),
                    session_id: self.session.as_ref().map(|s| s.session_id.clone()),
                };
                Task::done(ScreenMessage::ParentMessage(Route::Status(params)))
            }
            PaymentMessage::BackToSteps => Task::done(ScreenMessage::ParentMessage(Route::Step(
                Step::Terms,
                FormMode::Update,
            ))),
        }
    }

    fn view<'a>(&'a self, _state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let pay_label = if self.requesting {
            "Opening checkout..."
        } else {
            "Pay application fee"
        };
        let can_pay = self.accepted && !self.requesting;

        let mut content = column![
            text("Payment").size(28),
            text("Your application is complete. The fee is paid on the provider's secure checkout page, which opens in your browser."),
            checkbox(self.accepted)
                .label("I confirm my details are correct and accept the terms")
                .on_toggle(|accepted| {
                ScreenMessage::ScreenMessage(PaymentMessage::AcceptToggled(accepted))
            }),
            row![
                button(pay_label).on_press_maybe(
                    can_pay.then_some(ScreenMessage::ScreenMessage(PaymentMessage::Pay)),
                ),
                button("Back to application")
                    .on_press(ScreenMessage::ScreenMessage(PaymentMessage::BackToSteps)),
            ]
            .spacing(10),
        ]
        .spacing(16)
        .padding(20)
        .max_width(640);

        if self.session.is_some() {
            content = content.push(text(
                "Checkout opened in your browser. Once you have paid, check the result here.",
            ));
            content = content.push(
                button("I have paid, check status")
                    .on_press(ScreenMessage::ScreenMessage(PaymentMessage::CheckStatus)),
            );
        }

        container(content)
            .center_x(Length::Fill)
            .padding(30)
            .into()
    }
}

/// Open the hosted checkout page in the user's browser. Best effort; the
/// screen keeps a manual status check available either way.
fn open_checkout(url: &str) {
    info!(url, "opening checkout page");
    let result = if let Ok(browser) = std::env::var("BROWSER") {
        Command::new(browser).arg(url).spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };
    if let Err(e) = result {
        warn!(error = %e, url, "could not open browser");
    }
}
