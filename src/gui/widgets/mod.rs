use iced::widget::container::{Style, bordered_box};
use iced::widget::{button, column, container, row, text};
use iced::{Color, Element, Length, Theme, border};

use crate::core::wizard::{Step, WizardState};
use crate::gui::state::{Notification, NotificationKind};

fn step_style(step: Step, current: Step, done: bool) -> impl Fn(&Theme) -> Style {
    move |theme: &Theme| {
        let style = if step == current {
            bordered_box(theme).border(border::width(3))
        } else {
            bordered_box(theme)
        };
        // completed steps get a dimmed background
        if done && step != current {
            let mut color_rgba = theme.palette().background.into_rgba8();
            color_rgba[0] /= 2;
            color_rgba[1] /= 2;
            color_rgba[2] /= 2;
            style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
        } else {
            style.background(theme.palette().background)
        }
    }
}

/// Wizard layout: the step list down the left, the current step's content on
/// the right.
pub fn layout<'a, Message>(
    main_content: Element<'a, Message>,
    current: Step,
    wizard: &WizardState,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let mut sidebar = column![];
    for step in Step::ALL {
        sidebar = sidebar.push(
            container(text(format!("{}. {}", step.number(), step.title())).size(14))
                .style(step_style(step, current, wizard.is_completed(step)))
                .padding(10)
                .width(Length::Fill),
        );
    }
    container(row![
        container(sidebar).width(Length::FillPortion(1)),
        container(main_content).width(Length::FillPortion(3)),
    ])
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

/// Dismissable banner rendered above the current screen.
pub fn banner<'a, Message>(
    notification: &'a Notification,
    on_dismiss: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let label = match notification.kind {
        NotificationKind::Success => "OK",
        NotificationKind::Failure => "Error",
    };
    container(
        row![
            text(label).size(14),
            text(notification.text.as_str()).width(Length::Fill),
            button("Dismiss").on_press(on_dismiss),
        ]
        .spacing(10)
        .padding(8),
    )
    .style(bordered_box)
    .width(Length::Fill)
    .into()
}
