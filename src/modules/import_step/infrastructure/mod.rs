pub mod http_backend;
pub mod notifier;
pub mod wizard_steps;

pub use http_backend::HttpImportBackend;
pub use notifier::{ChannelNotifier, LogNotifier, Notification, NotificationLevel};
pub use wizard_steps::WizardSteps;
