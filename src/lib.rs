pub mod modules;
pub mod shared;

use modules::import_step::{
    infrastructure::Notification, ChannelNotifier, HttpImportBackend, ImportBackend,
    ImportStepAdapter, Notifier, StepController, WizardSteps,
};
use shared::{utils::init_logger, AppResult, ImportApiConfig};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Import step wired to its collaborators, ready for a host view
pub struct ImportWizard {
    pub adapter: ImportStepAdapter,
    pub steps: Arc<WizardSteps>,
    pub notifications: UnboundedReceiver<Notification>,
}

/// Build the import step against the HTTP import service
pub fn build_import_step(config: &ImportApiConfig) -> AppResult<ImportWizard> {
    let backend: Arc<dyn ImportBackend> = Arc::new(HttpImportBackend::new(config)?);
    let (notifier, notifications) = ChannelNotifier::channel();

    // The adapter only sees the ports, the host keeps the concrete step controller
    let steps = Arc::new(WizardSteps::default());
    let notifier: Arc<dyn Notifier> = Arc::new(notifier);
    let step_controller: Arc<dyn StepController> = steps.clone();

    let adapter = ImportStepAdapter::new(backend, notifier, step_controller);
    log_info!("Import step ready against {}", config.base_url);

    Ok(ImportWizard {
        adapter,
        steps,
        notifications,
    })
}

/// Start logging and build the import step from the environment (and `.env`)
pub fn run() -> AppResult<ImportWizard> {
    init_logger();

    let config = ImportApiConfig::from_env()?;
    build_import_step(&config)
}
