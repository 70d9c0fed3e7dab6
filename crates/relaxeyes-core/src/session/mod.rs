mod controller;
mod notification;
mod view;

pub use controller::{SessionConfig, SessionController, SessionPhase, SessionSnapshot};
pub use notification::{Notification, NotificationKind, NotificationPermission, NotificationPolicy};
pub use view::ActiveView;
