pub mod entities;
pub mod failure;

pub use entities::{
    AddedColumns, CsvExport, ImportDataResponse, ImportId, SelectedColumns, StepInputs,
    ValidDataResponse,
};
pub use failure::{
    BackendFailure, ErrorPayload, FailureKind, Operation, CONNECTIVITY_MESSAGE,
    CONNECTIVITY_STATUS_TEXT,
};
