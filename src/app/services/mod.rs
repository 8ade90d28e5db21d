pub mod action;

pub use action::ActionService;
