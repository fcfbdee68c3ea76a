use iced::widget::column;
use iced::{Element, Task, Theme};

use crate::config::Config;
use crate::core::payment::ReturnParams;
use crate::gui::screens::{self, Screen, ScreenData, ScreenMessage, step_form::FormMode};
use crate::gui::{AppState, Message, message::Route, widgets};

struct VisawizApp {
    state: AppState,
    screen: ScreenData,
}

impl VisawizApp {
    fn boot(config: Config, return_url: Option<String>) -> (Self, Task<Message>) {
        let mut state = AppState::new(config);
        // A return URL means we came back from the checkout provider; jump
        // straight to the status view. Otherwise resume from cached progress.
        let route = match return_url {
            Some(url) => Route::Status(ReturnParams::from_url(&url)),
            None => Route::Step(state.wizard.resume_step(), FormMode::Create),
        };
        let (screen, task) = screens::open(route, &mut state);
        (Self { state, screen }, task.map(unwrap_parent))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        self.screen
            .update(message, &mut self.state)
            .map(unwrap_parent)
    }

    fn view(&self) -> Element<'_, Message> {
        let screen = self.screen.view(&self.state).map(unwrap_parent);
        match &self.state.notification {
            Some(notification) => column![
                widgets::banner(notification, Message::DismissNotification),
                screen,
            ]
            .into(),
            None => screen,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn unwrap_parent(message: ScreenMessage<ScreenData>) -> Message {
    match message {
        ScreenMessage::ScreenMessage(message) => message,
        ScreenMessage::ParentMessage(never) => match never {},
    }
}

pub fn run(config: Config, return_url: Option<String>) -> iced::Result {
    iced::application(
        move || VisawizApp::boot(config.clone(), return_url.clone()),
        VisawizApp::update,
        VisawizApp::view,
    )
    .title("Visawiz")
    .theme(VisawizApp::theme)
    .run()
}
