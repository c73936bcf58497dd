pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{
    ImportBackend, ImportStepAdapter, Notifier, StepController, StepOutcome,
    MISSING_IMPORT_MESSAGE, NOT_VALIDATED_MESSAGE,
};
pub use domain::{
    AddedColumns, BackendFailure, CsvExport, ErrorPayload, FailureKind, ImportDataResponse,
    ImportId, Operation, SelectedColumns, StepInputs, ValidDataResponse, CONNECTIVITY_MESSAGE,
    CONNECTIVITY_STATUS_TEXT,
};
pub use infrastructure::{ChannelNotifier, HttpImportBackend, LogNotifier, WizardSteps};
