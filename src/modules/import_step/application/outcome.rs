/// How a single triggered operation ended
///
/// Failures are already reported to the notifier by the time an outcome is
/// returned, so hosts can ignore it.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    /// The backend answered and the snapshot was stored
    Completed(T),
    /// The backend call failed; carries the notified message
    Failed(String),
    /// A precondition was missing and no call was made; carries the notified message
    Skipped(String),
    /// The adapter was destroyed before the response arrived
    Cancelled,
    /// A newer call of the same operation was issued, this successful response was dropped
    Superseded,
}

impl<T> StepOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            StepOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Message pushed to the notifier, if any
    pub fn notified_message(&self) -> Option<&str> {
        match self {
            StepOutcome::Failed(message) | StepOutcome::Skipped(message) => Some(message),
            _ => None,
        }
    }
}
