pub mod adapter;
pub mod outcome;
pub mod ports;

pub use adapter::{ImportStepAdapter, MISSING_IMPORT_MESSAGE, NOT_VALIDATED_MESSAGE};
pub use outcome::StepOutcome;
pub use ports::{ImportBackend, Notifier, StepController};
