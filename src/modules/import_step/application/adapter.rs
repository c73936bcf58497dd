//! Import step of the data-import wizard
//!
//! Forwards user actions to the import service, keeps the last response of
//! each call as a snapshot for the view, and turns failures into notifications.
//! Failures never reach the host view.

use crate::modules::import_step::application::outcome::StepOutcome;
use crate::modules::import_step::application::ports::{ImportBackend, Notifier, StepController};
use crate::modules::import_step::domain::{
    AddedColumns, BackendFailure, CsvExport, FailureKind, ImportDataResponse, ImportId,
    Operation, SelectedColumns, StepInputs, ValidDataResponse,
};
use crate::shared::utils::LogContext;
use crate::{log_debug, log_info, log_warn};
use std::fmt::Debug;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const MISSING_IMPORT_MESSAGE: &str = "ERROR: NO IMPORT SELECTED";
pub const NOT_VALIDATED_MESSAGE: &str = "ERROR: VALIDATE THE DATA BEFORE IMPORTING";

#[derive(Debug, Default)]
struct StepState {
    inputs: StepInputs,
    import_data_res: Option<ImportDataResponse>,
    valid_data: Option<ValidDataResponse>,
    total_columns: Option<usize>,
    csv_resp: Option<CsvExport>,
    is_collapsed: bool,
}

/// Per-operation counter of issued calls. Only the latest call may write its snapshot.
#[derive(Debug, Default)]
struct CallGenerations([AtomicU64; 3]);

impl CallGenerations {
    fn issue(&self, operation: Operation) -> u64 {
        self.0[operation.index()].fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, operation: Operation, generation: u64) -> bool {
        self.0[operation.index()].load(Ordering::SeqCst) == generation
    }
}

/// View adapter for the final wizard step
///
/// Cloning is cheap and clones share state, so spawned calls write back into
/// the same snapshots. All calls are tied to the adapter lifetime: after
/// [`ImportStepAdapter::destroy`] in-flight responses are dropped silently.
#[derive(Clone)]
pub struct ImportStepAdapter {
    backend: Arc<dyn ImportBackend>,
    notifier: Arc<dyn Notifier>,
    steps: Arc<dyn StepController>,
    state: Arc<RwLock<StepState>>,
    generations: Arc<CallGenerations>,
    lifetime: CancellationToken,
}

impl ImportStepAdapter {
    pub fn new(
        backend: Arc<dyn ImportBackend>,
        notifier: Arc<dyn Notifier>,
        steps: Arc<dyn StepController>,
    ) -> Self {
        Self {
            backend,
            notifier,
            steps,
            state: Arc::new(RwLock::new(StepState::default())),
            generations: Arc::new(CallGenerations::default()),
            lifetime: CancellationToken::new(),
        }
    }

    // ========================================================================
    // Inputs from the parent view
    // ========================================================================

    pub async fn set_inputs(&self, inputs: StepInputs) {
        self.state.write().await.inputs = inputs;
    }

    pub async fn set_import_id(&self, import_id: impl Into<ImportId>) {
        self.state.write().await.inputs.import_id = Some(import_id.into());
    }

    pub async fn set_selected_columns(&self, selected_columns: SelectedColumns) {
        self.state.write().await.inputs.selected_columns = selected_columns;
    }

    pub async fn set_added_columns(&self, added_columns: AddedColumns) {
        self.state.write().await.inputs.added_columns = added_columns;
    }

    pub async fn inputs(&self) -> StepInputs {
        self.state.read().await.inputs.clone()
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// Go back to the previous wizard step. Never touches the backend.
    pub fn on_step_back(&self) {
        log_debug!("Import step: going back to the previous step");
        self.steps.previous_step();
    }

    /// Import using the column count of the last successful validation
    pub async fn on_import(&self) -> StepOutcome<ImportDataResponse> {
        let (import_id, total_columns) = {
            let state = self.state.read().await;
            (state.inputs.import_id.clone(), state.total_columns)
        };

        let Some(import_id) = import_id else {
            return self.skip(Operation::Import, MISSING_IMPORT_MESSAGE);
        };
        let Some(total_columns) = total_columns else {
            return self.skip(Operation::Import, NOT_VALIDATED_MESSAGE);
        };

        self.run_import(import_id, total_columns).await
    }

    /// Import with a column count supplied by the caller
    pub async fn import_with(&self, total_columns: usize) -> StepOutcome<ImportDataResponse> {
        let import_id = self.state.read().await.inputs.import_id.clone();
        match import_id {
            Some(import_id) => self.run_import(import_id, total_columns).await,
            None => self.skip(Operation::Import, MISSING_IMPORT_MESSAGE),
        }
    }

    pub async fn get_valid_data(&self) -> StepOutcome<ValidDataResponse> {
        let StepInputs {
            import_id,
            selected_columns,
            added_columns,
        } = self.inputs().await;

        let Some(import_id) = import_id else {
            return self.skip(Operation::ValidData, MISSING_IMPORT_MESSAGE);
        };

        let backend = Arc::clone(&self.backend);
        self.execute(
            Operation::ValidData,
            async move {
                backend
                    .get_valid_data(&import_id, &selected_columns, &added_columns)
                    .await
            },
            |state, response| {
                state.total_columns = response.total_columns;
                state.valid_data = Some(response);
            },
        )
        .await
    }

    pub async fn on_csv(&self) -> StepOutcome<CsvExport> {
        let import_id = self.state.read().await.inputs.import_id.clone();
        let Some(import_id) = import_id else {
            return self.skip(Operation::Csv, MISSING_IMPORT_MESSAGE);
        };

        let backend = Arc::clone(&self.backend);
        self.execute(
            Operation::Csv,
            async move { backend.get_csv(&import_id).await },
            |state, response| state.csv_resp = Some(response),
        )
        .await
    }

    // Fire-and-forget variants for event handlers

    pub fn spawn_import(&self) -> JoinHandle<StepOutcome<ImportDataResponse>> {
        let adapter = self.clone();
        tokio::spawn(async move { adapter.on_import().await })
    }

    pub fn spawn_valid_data(&self) -> JoinHandle<StepOutcome<ValidDataResponse>> {
        let adapter = self.clone();
        tokio::spawn(async move { adapter.get_valid_data().await })
    }

    pub fn spawn_csv(&self) -> JoinHandle<StepOutcome<CsvExport>> {
        let adapter = self.clone();
        tokio::spawn(async move { adapter.on_csv().await })
    }

    // ========================================================================
    // View state
    // ========================================================================

    pub async fn import_data_res(&self) -> Option<ImportDataResponse> {
        self.state.read().await.import_data_res.clone()
    }

    pub async fn valid_data(&self) -> Option<ValidDataResponse> {
        self.state.read().await.valid_data.clone()
    }

    pub async fn total_columns(&self) -> Option<usize> {
        self.state.read().await.total_columns
    }

    pub async fn csv_resp(&self) -> Option<CsvExport> {
        self.state.read().await.csv_resp.clone()
    }

    pub async fn is_collapsed(&self) -> bool {
        self.state.read().await.is_collapsed
    }

    /// Flip the collapsed flag of the step panel, returning the new value
    pub async fn toggle_collapsed(&self) -> bool {
        let mut state = self.state.write().await;
        state.is_collapsed = !state.is_collapsed;
        state.is_collapsed
    }

    /// Tear down: cancel every in-flight call
    pub fn destroy(&self) {
        if !self.lifetime.is_cancelled() {
            log_info!("Import step destroyed, cancelling pending calls");
            self.lifetime.cancel();
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn run_import(
        &self,
        import_id: ImportId,
        total_columns: usize,
    ) -> StepOutcome<ImportDataResponse> {
        let backend = Arc::clone(&self.backend);
        self.execute(
            Operation::Import,
            async move { backend.import_data(&import_id, total_columns).await },
            |state, response| state.import_data_res = Some(response),
        )
        .await
    }

    async fn execute<T, Fut, S>(&self, operation: Operation, call: Fut, store: S) -> StepOutcome<T>
    where
        T: Clone + Debug,
        Fut: Future<Output = Result<T, BackendFailure>>,
        S: FnOnce(&mut StepState, T),
    {
        if self.lifetime.is_cancelled() {
            log_debug!("Import step: {} not sent, step already destroyed", operation);
            return StepOutcome::Cancelled;
        }

        let generation = self.generations.issue(operation);

        let result = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => {
                log_debug!("Import step: {} cancelled", operation);
                return StepOutcome::Cancelled;
            }
            result = call => result,
        };

        match result {
            Ok(response) => {
                let mut state = self.state.write().await;
                if self.lifetime.is_cancelled() {
                    return StepOutcome::Cancelled;
                }
                if !self.generations.is_latest(operation, generation) {
                    log_debug!(
                        "Import step: dropping stale {} response (call #{})",
                        operation,
                        generation
                    );
                    return StepOutcome::Superseded;
                }

                log_debug!("Import step: {} response: {:?}", operation, response);
                store(&mut state, response.clone());
                StepOutcome::Completed(response)
            }
            Err(failure) => {
                // Failures store nothing, so even a superseded call is reported
                if !self.generations.is_latest(operation, generation) {
                    log_debug!(
                        "Import step: {} call #{} failed after a newer call was issued",
                        operation,
                        generation
                    );
                }

                match failure.kind() {
                    FailureKind::Connectivity => {
                        log_warn!("Import step: {} could not reach the import service", operation)
                    }
                    FailureKind::ServerReported => LogContext::error_with_context(
                        &failure,
                        &format!("Import step: {} failed", operation),
                    ),
                }

                let message = failure.user_message(operation);
                self.notifier.error(&message);
                StepOutcome::Failed(message)
            }
        }
    }

    fn skip<T>(&self, operation: Operation, message: &str) -> StepOutcome<T> {
        log_warn!("Import step: {} skipped: {}", operation, message);
        self.notifier.error(message);
        StepOutcome::Skipped(message.to_string())
    }
}
