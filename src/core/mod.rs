pub mod cache;
pub mod forms;
pub mod payment;
pub mod sequencer;
pub mod wizard;
