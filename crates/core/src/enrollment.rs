//! Class enrollment selection.
//!
//! When adding students to a class, the picker lists every student that is
//! not already enrolled, the user ticks some of them, and only the ticked,
//! still-unenrolled ids are sent to the server.

use std::collections::HashSet;

use crate::student::StudentSummary;
use crate::types::EntityId;

/// Students from `candidates` that are not in `enrolled`, in input order.
pub fn available_for_selection(
    candidates: &[StudentSummary],
    enrolled: &HashSet<EntityId>,
) -> Vec<StudentSummary> {
    candidates
        .iter()
        .filter(|s| !enrolled.contains(&s.id))
        .cloned()
        .collect()
}

/// Local selection state of the enrollment picker.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentSelection {
    enrolled: HashSet<EntityId>,
    /// Selected ids in click order, without duplicates.
    selected: Vec<EntityId>,
}

impl EnrollmentSelection {
    pub fn new(enrolled: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            enrolled: enrolled.into_iter().collect(),
            selected: Vec::new(),
        }
    }

    /// Replace the enrolled set (after a refetch). Selections that became
    /// enrolled in the meantime are dropped.
    pub fn set_enrolled(&mut self, enrolled: impl IntoIterator<Item = EntityId>) {
        self.enrolled = enrolled.into_iter().collect();
        let enrolled = &self.enrolled;
        self.selected.retain(|id| !enrolled.contains(id));
    }

    pub fn enrolled(&self) -> &HashSet<EntityId> {
        &self.enrolled
    }

    pub fn is_enrolled(&self, student_id: &str) -> bool {
        self.enrolled.contains(student_id)
    }

    pub fn is_selected(&self, student_id: &str) -> bool {
        self.selected.iter().any(|id| id == student_id)
    }

    /// Flip the selection of one student. Returns `false` (and changes
    /// nothing) for a student that is already enrolled.
    pub fn toggle(&mut self, student_id: &str) -> bool {
        if self.is_enrolled(student_id) {
            return false;
        }
        if let Some(pos) = self.selected.iter().position(|id| id == student_id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(student_id.to_string());
        }
        true
    }

    /// Ids to send with `POST /student-classes`.
    pub fn pending(&self) -> Vec<EntityId> {
        self.selected
            .iter()
            .filter(|id| !self.enrolled.contains(*id))
            .cloned()
            .collect()
    }

    /// Record a successful submission: the pending ids become enrolled.
    pub fn commit(&mut self) {
        let pending = std::mem::take(&mut self.selected);
        self.enrolled.extend(pending);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn enrolled_count(&self) -> usize {
        self.enrolled.len()
    }
}
