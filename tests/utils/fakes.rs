/// Recording fakes for the import step ports
use async_trait::async_trait;
use import_wizard_lib::modules::import_step::{
    AddedColumns, BackendFailure, CsvExport, ImportBackend, ImportDataResponse, ImportId,
    Notifier, SelectedColumns, StepController, ValidDataResponse,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct CountingSteps {
    back: AtomicUsize,
}

impl CountingSteps {
    pub fn back_count(&self) -> usize {
        self.back.load(Ordering::SeqCst)
    }
}

impl StepController for CountingSteps {
    fn previous_step(&self) {
        self.back.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Import {
        import_id: ImportId,
        total_columns: usize,
    },
    ValidData {
        import_id: ImportId,
        selected_columns: SelectedColumns,
        added_columns: AddedColumns,
    },
    Csv {
        import_id: ImportId,
    },
}

type Scripted<T> = (Result<T, BackendFailure>, Option<oneshot::Receiver<()>>);

struct Script<T>(Mutex<VecDeque<Scripted<T>>>);

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T> Script<T> {
    fn push(&self, result: Result<T, BackendFailure>) {
        self.0.lock().unwrap().push_back((result, None));
    }

    /// The reply is held back until the returned sender fires
    fn push_gated(&self, result: Result<T, BackendFailure>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.0.lock().unwrap().push_back((result, Some(gate)));
        release
    }

    async fn next(&self) -> Result<T, BackendFailure> {
        let entry = self.0.lock().unwrap().pop_front();
        let (result, gate) = entry.expect("backend call was not scripted");
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

/// Backend answering from per-operation scripts and recording every call
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<BackendCall>>,
    imports: Script<ImportDataResponse>,
    valid_data: Script<ValidDataResponse>,
    csv: Script<CsvExport>,
}

impl ScriptedBackend {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_import(&self, result: Result<ImportDataResponse, BackendFailure>) {
        self.imports.push(result);
    }

    pub fn push_import_gated(
        &self,
        result: Result<ImportDataResponse, BackendFailure>,
    ) -> oneshot::Sender<()> {
        self.imports.push_gated(result)
    }

    pub fn push_valid_data(&self, result: Result<ValidDataResponse, BackendFailure>) {
        self.valid_data.push(result);
    }

    pub fn push_csv(&self, result: Result<CsvExport, BackendFailure>) {
        self.csv.push(result);
    }

    pub fn push_csv_gated(&self, result: Result<CsvExport, BackendFailure>) -> oneshot::Sender<()> {
        self.csv.push_gated(result)
    }

    /// Wait until at least `count` calls reached the backend
    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..200 {
            if self.calls.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("backend saw fewer than {} calls", count);
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ImportBackend for ScriptedBackend {
    async fn import_data(
        &self,
        import_id: &ImportId,
        total_columns: usize,
    ) -> Result<ImportDataResponse, BackendFailure> {
        self.record(BackendCall::Import {
            import_id: import_id.clone(),
            total_columns,
        });
        self.imports.next().await
    }

    async fn get_valid_data(
        &self,
        import_id: &ImportId,
        selected_columns: &SelectedColumns,
        added_columns: &AddedColumns,
    ) -> Result<ValidDataResponse, BackendFailure> {
        self.record(BackendCall::ValidData {
            import_id: import_id.clone(),
            selected_columns: selected_columns.clone(),
            added_columns: added_columns.clone(),
        });
        self.valid_data.next().await
    }

    async fn get_csv(&self, import_id: &ImportId) -> Result<CsvExport, BackendFailure> {
        self.record(BackendCall::Csv {
            import_id: import_id.clone(),
        });
        self.csv.next().await
    }
}
