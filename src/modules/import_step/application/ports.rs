use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::modules::import_step::domain::{
    AddedColumns, BackendFailure, CsvExport, ImportDataResponse, ImportId, SelectedColumns,
    ValidDataResponse,
};

/// Port (interface) for the import data service
/// Infrastructure layer implements this over HTTP
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImportBackend: Send + Sync {
    /// Load the checked rows of an import into the destination
    async fn import_data(
        &self,
        import_id: &ImportId,
        total_columns: usize,
    ) -> Result<ImportDataResponse, BackendFailure>;

    /// Run validation with the user's column choices
    async fn get_valid_data(
        &self,
        import_id: &ImportId,
        selected_columns: &SelectedColumns,
        added_columns: &AddedColumns,
    ) -> Result<ValidDataResponse, BackendFailure>;

    /// Fetch the CSV export of an import
    async fn get_csv(&self, import_id: &ImportId) -> Result<CsvExport, BackendFailure>;
}

/// Port for transient user notifications (toasts)
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Port onto the wizard that owns step navigation
#[cfg_attr(test, automock)]
pub trait StepController: Send + Sync {
    fn previous_step(&self);
}
