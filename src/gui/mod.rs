mod app;
pub mod message;
pub mod screens;
pub mod state;
pub mod widgets;

pub use app::run;
pub use message::{Message, Route};
pub use state::AppState;
