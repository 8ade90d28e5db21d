pub mod manager;

pub use manager::{ActiveNotice, NotificationManager};
