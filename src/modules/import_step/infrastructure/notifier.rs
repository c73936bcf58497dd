use crate::log_error;
use crate::modules::import_step::application::ports::Notifier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
}

/// A toast ready to be shown by the view layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Writes notifications to the application log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        log_error!("[toast] {}", message);
    }
}

/// Forwards notifications to the view over a channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn error(&self, message: &str) {
        let notification = Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
            raised_at: Utc::now(),
        };

        // The view may already be gone
        if self.sender.send(notification).is_err() {
            log_error!("[toast, no listener] {}", message);
        }
    }
}
