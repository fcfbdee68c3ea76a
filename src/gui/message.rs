use crate::core::payment::ReturnParams;
use crate::core::wizard::Step;
use crate::gui::screens::{
    ScreenMessage, payment::PaymentScreen, status::StatusScreen,
    step_form::{FormMode, StepFormScreen},
};

#[derive(Debug, Clone)]
pub enum Message {
    StepForm(ScreenMessage<StepFormScreen>),
    Payment(ScreenMessage<PaymentScreen>),
    Status(ScreenMessage<StatusScreen>),
    Navigate(Route),
    DismissNotification,
}

/// Client-side navigation targets: one per wizard step (with its create or
/// update mode), the payment screen, and the post-payment status screen.
#[derive(Debug, Clone)]
pub enum Route {
    Step(Step, FormMode),
    Payment,
    Status(ReturnParams),
    Restart,
}
