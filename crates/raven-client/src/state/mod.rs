pub mod app_state;
pub mod notifications;
pub mod settings;

pub use app_state::*;
pub use notifications::{Notification, NotificationLevel, Notifications};
pub use settings::UiState;
