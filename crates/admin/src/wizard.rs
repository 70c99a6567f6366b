//! Registration flow: the step navigation of [`RegistrationWizard`] plus one
//! parent-supplied submit callback per step.
//!
//! "Save and advance" calls the current step's callback and moves on only
//! when it succeeds. "Skip" moves on without calling it.

use std::collections::HashMap;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use casa_core::wizard::{RegistrationStep, RegistrationWizard};

use crate::error::AdminError;

/// Submit handler owned by the parent for one step's form.
pub type StepSubmit = Box<dyn Fn() -> BoxFuture<'static, Result<(), AdminError>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to this step.
    Advanced(RegistrationStep),
    /// The last step was saved.
    Completed,
}

#[derive(Default)]
pub struct RegistrationFlow {
    wizard: RegistrationWizard,
    handlers: HashMap<RegistrationStep, StepSubmit>,
}

impl RegistrationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the submit handler of `step`. Steps without one advance
    /// without saving.
    pub fn on_submit<F, Fut>(mut self, step: RegistrationStep, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AdminError>> + Send + 'static,
    {
        self.handlers
            .insert(step, Box::new(move || handler().boxed()));
        self
    }

    pub fn current_step(&self) -> RegistrationStep {
        self.wizard.current_step()
    }

    pub fn wizard(&self) -> &RegistrationWizard {
        &self.wizard
    }

    pub fn advance_label(&self) -> &'static str {
        self.wizard.advance_label()
    }

    /// Submit the current step's form, then advance.
    ///
    /// On error the flow stays on the current step and the error is
    /// returned for the form to display.
    pub async fn save_and_advance(&mut self) -> Result<StepOutcome, AdminError> {
        let step = self.wizard.current_step();
        if let Some(handler) = self.handlers.get(&step) {
            if let Err(e) = handler().await {
                tracing::warn!(step = step.label(), error = %e, "Registration step not saved");
                return Err(e);
            }
            tracing::info!(step = step.label(), "Registration step saved");
        }
        Ok(self.advance())
    }

    pub fn skip(&mut self) -> StepOutcome {
        self.advance()
    }

    /// Go back to a visited step. Unvisited steps are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        self.wizard.jump_to(index)
    }

    fn advance(&mut self) -> StepOutcome {
        if self.wizard.skip() {
            StepOutcome::Advanced(self.wizard.current_step())
        } else {
            StepOutcome::Completed
        }
    }
}
