//! Student registration wizard steps and navigation state.
//!
//! The wizard walks through a fixed sequence of sub-forms. Navigation is
//! forward-only except for jumps back to steps that were already visited.
//! Reaching the last step changes the advance label but is not a distinct
//! terminal state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    StudentData,
    FamilyData,
    HealthData,
    SocialData,
}

/// Steps in display order.
pub const STEPS: [RegistrationStep; 4] = [
    RegistrationStep::StudentData,
    RegistrationStep::FamilyData,
    RegistrationStep::HealthData,
    RegistrationStep::SocialData,
];

/// Label of the advance button on every step but the last.
pub const ADVANCE_LABEL: &str = "Avançar";

/// Label of the advance button on the last step.
pub const FINISH_LABEL: &str = "Concluir";

impl RegistrationStep {
    /// Convert a 0-based index to a step.
    pub fn from_index(index: usize) -> Result<Self, CoreError> {
        STEPS.get(index).copied().ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid step index {index}. Must be below {}",
                STEPS.len()
            ))
        })
    }

    pub fn index(self) -> usize {
        match self {
            Self::StudentData => 0,
            Self::FamilyData => 1,
            Self::HealthData => 2,
            Self::SocialData => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StudentData => "Dados do Aluno",
            Self::FamilyData => "Dados Familiares",
            Self::HealthData => "Dados de Saúde",
            Self::SocialData => "Dados Sociais",
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWizard {
    current: usize,
    visited: BTreeSet<usize>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    /// Start on the first step, which counts as visited.
    pub fn new() -> Self {
        Self {
            current: 0,
            visited: BTreeSet::from([0]),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> RegistrationStep {
        STEPS[self.current]
    }

    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.visited.contains(&index)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == STEPS.len()
    }

    /// Advance one step and mark it visited. Returns `false` on the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        self.visited.insert(self.current);
        true
    }

    /// Advance without saving the current step's form.
    pub fn skip(&mut self) -> bool {
        self.next()
    }

    /// Move to an already-visited step. Unvisited targets leave the state
    /// untouched and return `false`.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if !self.visited.contains(&index) {
            return false;
        }
        self.current = index;
        true
    }

    pub fn advance_label(&self) -> &'static str {
        if self.is_last() {
            FINISH_LABEL
        } else {
            ADVANCE_LABEL
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
