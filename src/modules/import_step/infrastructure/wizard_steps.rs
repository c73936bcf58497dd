use crate::log_debug;
use crate::modules::import_step::application::ports::StepController;
use tokio::sync::watch;

/// In-memory step navigation for the import wizard
///
/// The current step is published on a watch channel so the host view can
/// re-render when it changes.
#[derive(Debug)]
pub struct WizardSteps {
    current: watch::Sender<usize>,
    first: usize,
    last: usize,
}

impl WizardSteps {
    /// Steps numbered `first..=last`, starting on `first`
    pub fn new(first: usize, last: usize) -> Self {
        let last = last.max(first);
        let (current, _) = watch::channel(first);
        Self {
            current,
            first,
            last,
        }
    }

    /// Start on a given step, clamped into range
    pub fn starting_at(first: usize, last: usize, step: usize) -> Self {
        let steps = Self::new(first, last);
        steps.go_to(step);
        steps
    }

    pub fn current(&self) -> usize {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.current.subscribe()
    }

    pub fn next_step(&self) {
        let last = self.last;
        self.move_to(|step| (step + 1).min(last));
    }

    pub fn reset(&self) {
        self.go_to(self.first);
    }

    fn go_to(&self, step: usize) {
        let target = step.clamp(self.first, self.last);
        self.move_to(|_| target);
    }

    fn move_to(&self, next: impl FnOnce(usize) -> usize) {
        self.current.send_if_modified(|step| {
            let target = next(*step);
            if target == *step {
                return false;
            }
            log_debug!("Wizard: step {} -> {}", step, target);
            *step = target;
            true
        });
    }
}

impl Default for WizardSteps {
    fn default() -> Self {
        Self::new(1, 4)
    }
}

impl StepController for WizardSteps {
    fn previous_step(&self) {
        let first = self.first;
        self.move_to(|step| step.saturating_sub(1).max(first));
    }
}
