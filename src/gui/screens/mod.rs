pub mod payment;
pub mod status;
pub mod step_form;

use iced::{Element, Task};
use tracing::warn;

use crate::core::wizard::{Step, WizardAction};
use crate::gui::{
    AppState, Message,
    message::Route,
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug + Clone;
    type ParentMessage: std::fmt::Debug + Clone;
    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    StepForm(step_form::StepFormScreen),
    Payment(payment::PaymentScreen),
    Status(status::StatusScreen),
}

/// Build the screen for a route, together with its entry task.
pub fn open(route: Route, state: &mut AppState) -> (ScreenData, Task<ScreenMessage<ScreenData>>) {
    match route {
        Route::Step(step, mode) => {
            let (screen, task) = step_form::StepFormScreen::enter(step, mode, state);
            (
                ScreenData::StepForm(screen),
                task.map(Message::StepForm).map(ScreenMessage::ScreenMessage),
            )
        }
        Route::Payment => (
            ScreenData::Payment(payment::PaymentScreen::new(state)),
            Task::none(),
        ),
        Route::Status(params) => {
            let (screen, task) = status::StatusScreen::enter(params, state);
            (
                ScreenData::Status(screen),
                task.map(Message::Status).map(ScreenMessage::ScreenMessage),
            )
        }
        Route::Restart => {
            // Explicit new-application start: drop cached progress first.
            state.wizard.apply(WizardAction::Clear);
            if let Err(e) = state.cache.clear() {
                warn!(error = %e, "failed to clear progress cache");
            }
            open(Route::Step(Step::first(), step_form::FormMode::Create), state)
        }
    }
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        match self {
            ScreenData::StepForm(screen) => screen.view(state).map(Message::StepForm),
            ScreenData::Payment(screen) => screen.view(state).map(Message::Payment),
            ScreenData::Status(screen) => screen.view(state).map(Message::Status),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::Navigate(route)) => {
                let (screen, task) = open(route, state);
                *x = screen;
                task
            }
            (_, Message::DismissNotification) => {
                state.notification = None;
                Task::none()
            }
            (ScreenData::StepForm(page), Message::StepForm(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::StepForm)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(route) => {
                    Task::done(ScreenMessage::ScreenMessage(Message::Navigate(route)))
                }
            },
            (ScreenData::Payment(page), Message::Payment(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Payment)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(route) => {
                    Task::done(ScreenMessage::ScreenMessage(Message::Navigate(route)))
                }
            },
            (ScreenData::Status(page), Message::Status(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Status)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(route) => {
                    Task::done(ScreenMessage::ScreenMessage(Message::Navigate(route)))
                }
            },
            // A message addressed to a screen that is no longer current,
            // e.g. a timer that fired after navigation. Dropped.
            _ => Task::none(),
        }
    }
}
