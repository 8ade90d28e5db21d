pub mod action;
pub mod event;
pub mod item;
pub mod notice;

pub use action::Action;
pub use event::{ArcEventTx, Event, EventTx};
pub use item::{Item, ItemState};
pub use notice::*;
