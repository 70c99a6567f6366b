//! Presence board: the client-side state behind the attendance roster.
//!
//! The board combines two inputs:
//!
//! - the *visible* roster, i.e. the students returned by the latest fetch
//!   (already filtered by the search term), and
//! - a presence map `student_id -> is_present` that outlives fetches.
//!
//! After every mutation the submission list is regenerated from the visible
//! roster, so it always holds exactly one entry per visible student.
//! Students that drop out of the visible roster (because the search term
//! changed) keep their flag in the map and get it back when they reappear.

use std::collections::{HashMap, HashSet};

use crate::attendance::{AttendanceDetail, PresenceEntry};
use crate::error::CoreError;
use crate::sorting::compare_names;
use crate::student::StudentSummary;
use crate::types::EntityId;

#[derive(Debug, Clone, Default)]
pub struct PresenceBoard {
    visible: Vec<StudentSummary>,
    presence: HashMap<EntityId, bool>,
    observations: HashMap<EntityId, String>,
    entries: Vec<PresenceEntry>,
}

impl PresenceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh board from the detail rows of a persisted session.
    pub fn from_details(details: &[AttendanceDetail]) -> Self {
        let mut board = Self::new();
        for detail in details {
            board
                .presence
                .insert(detail.student_id.clone(), detail.is_present);
            if let Some(note) = detail.observations.as_deref().filter(|n| !n.is_empty()) {
                board
                    .observations
                    .insert(detail.student_id.clone(), note.to_string());
            }
        }
        board.load(details.iter().map(AttendanceDetail::student_summary).collect());
        board
    }

    /// Replace the visible roster with a fresh fetch.
    ///
    /// Duplicate rows are collapsed (the last occurrence wins), rows are
    /// sorted by localized name, and students not yet in the presence map
    /// are seeded as absent. Existing flags are never overwritten.
    pub fn load(&mut self, students: Vec<StudentSummary>) {
        let mut by_id: HashMap<EntityId, StudentSummary> = HashMap::with_capacity(students.len());
        for student in students {
            by_id.insert(student.id.clone(), student);
        }

        let mut visible: Vec<StudentSummary> = by_id.into_values().collect();
        visible.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));

        for student in &visible {
            self.presence.entry(student.id.clone()).or_insert(false);
        }
        self.visible = visible;
        self.rebuild();
    }

    /// Set every visible student's flag. Students hidden by the current
    /// search are not touched.
    pub fn toggle_all(&mut self, is_present: bool) {
        for student in &self.visible {
            self.presence.insert(student.id.clone(), is_present);
        }
        self.rebuild();
    }

    /// Set one visible student's flag.
    pub fn toggle_presence(&mut self, student_id: &str, is_present: bool) -> Result<(), CoreError> {
        self.ensure_visible(student_id)?;
        self.presence.insert(student_id.to_string(), is_present);
        self.rebuild();
        Ok(())
    }

    /// Attach or clear (empty string) the observation note for a visible student.
    pub fn set_observations(&mut self, student_id: &str, note: &str) -> Result<(), CoreError> {
        self.ensure_visible(student_id)?;
        if note.is_empty() {
            self.observations.remove(student_id);
        } else {
            self.observations
                .insert(student_id.to_string(), note.to_string());
        }
        self.rebuild();
        Ok(())
    }

    pub fn is_present(&self, student_id: &str) -> Option<bool> {
        self.presence.get(student_id).copied()
    }

    pub fn visible(&self) -> &[StudentSummary] {
        &self.visible
    }

    /// The submission list derived from the visible roster.
    pub fn entries(&self) -> &[PresenceEntry] {
        &self.entries
    }

    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_present).count()
    }

    /// `true` when every visible student is marked present (and there is at
    /// least one). Drives the "select all" checkbox state.
    pub fn all_present(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.is_present)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Drop all state: roster, flags and notes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn ensure_visible(&self, student_id: &str) -> Result<(), CoreError> {
        if self.visible.iter().any(|s| s.id == student_id) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "RosterStudent",
                id: student_id.to_string(),
            })
        }
    }

    /// Regenerate the submission list, one entry per student id.
    fn rebuild(&mut self) {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.visible.len());
        let mut entries = Vec::with_capacity(self.visible.len());
        for student in &self.visible {
            if !seen.insert(student.id.as_str()) {
                continue;
            }
            entries.push(PresenceEntry {
                student_id: student.id.clone(),
                is_present: self.presence.get(&student.id).copied().unwrap_or(false),
                observations: self
                    .observations
                    .get(&student.id)
                    .cloned()
                    .unwrap_or_default(),
            });
        }
        self.entries = entries;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::DetailStudent;

    fn student(id: &str, name: &str) -> StudentSummary {
        StudentSummary::new(id, name)
    }

    fn roster() -> Vec<StudentSummary> {
        vec![
            student("s3", "Carla"),
            student("s1", "Ana"),
            student("s2", "Bruno"),
        ]
    }

    fn ids(board: &PresenceBoard) -> Vec<&str> {
        board.entries().iter().map(|e| e.student_id.as_str()).collect()
    }

    fn assert_one_entry_per_visible(board: &PresenceBoard) {
        let visible: HashSet<&str> = board.visible().iter().map(|s| s.id.as_str()).collect();
        let entry_ids: Vec<&str> = ids(board);
        let unique: HashSet<&str> = entry_ids.iter().copied().collect();
        assert_eq!(entry_ids.len(), unique.len(), "duplicate entries");
        assert_eq!(unique, visible);
    }

    // -- load --

    #[test]
    fn load_sorts_by_name_and_seeds_absent() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        assert_eq!(ids(&board), vec!["s1", "s2", "s3"]);
        assert!(board.entries().iter().all(|e| !e.is_present));
        assert_eq!(board.is_present("s2"), Some(false));
    }

    #[test]
    fn load_collapses_duplicate_rows() {
        let mut board = PresenceBoard::new();
        let mut rows = roster();
        rows.push(student("s1", "Ana"));
        board.load(rows);
        assert_eq!(board.entries().len(), 3);
        assert_one_entry_per_visible(&board);
    }

    #[test]
    fn refetch_keeps_existing_flags() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        board.toggle_presence("s2", true).unwrap();

        board.load(roster());
        assert_eq!(board.is_present("s2"), Some(true));
        assert_eq!(board.present_count(), 1);
    }

    #[test]
    fn filtered_out_students_keep_flags_for_later() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        board.toggle_presence("s3", true).unwrap();

        // Search narrows the roster to Ana only.
        board.load(vec![student("s1", "Ana")]);
        assert_eq!(ids(&board), vec!["s1"]);

        // Clearing the search brings Carla back still present.
        board.load(roster());
        assert_eq!(board.is_present("s3"), Some(true));
    }

    // -- toggles --

    #[test]
    fn toggle_all_only_touches_visible_rows() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        board.load(vec![student("s1", "Ana"), student("s2", "Bruno")]);

        board.toggle_all(true);
        assert!(board.all_present());
        assert_eq!(board.is_present("s3"), Some(false));
        assert_one_entry_per_visible(&board);
    }

    #[test]
    fn toggle_presence_unknown_student_is_not_found() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        assert!(board.toggle_presence("ghost", true).is_err());
        assert_eq!(board.present_count(), 0);
    }

    #[test]
    fn mixed_toggle_sequences_keep_one_entry_per_student() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        let ops: [(Option<&str>, bool); 6] = [
            (None, true),
            (Some("s1"), false),
            (Some("s1"), true),
            (None, false),
            (Some("s3"), true),
            (Some("s3"), true),
        ];
        for (target, value) in ops {
            match target {
                Some(id) => board.toggle_presence(id, value).unwrap(),
                None => board.toggle_all(value),
            }
            assert_one_entry_per_visible(&board);
        }
        assert_eq!(board.present_count(), 1);
        assert_eq!(board.is_present("s3"), Some(true));
    }

    #[test]
    fn observations_flow_into_entries() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        board.set_observations("s1", "saiu mais cedo").unwrap();
        assert_eq!(board.entries()[0].observations, "saiu mais cedo");
        board.set_observations("s1", "").unwrap();
        assert_eq!(board.entries()[0].observations, "");
    }

    // -- hydration --

    #[test]
    fn from_details_restores_flags_and_notes() {
        let details = vec![
            AttendanceDetail {
                student_id: "s2".to_string(),
                is_present: true,
                observations: Some("trouxe atestado".to_string()),
                student: Some(DetailStudent {
                    name: "Bruno".to_string(),
                    avatar_url: None,
                }),
            },
            AttendanceDetail {
                student_id: "s1".to_string(),
                is_present: false,
                observations: None,
                student: Some(DetailStudent {
                    name: "Ana".to_string(),
                    avatar_url: None,
                }),
            },
        ];
        let board = PresenceBoard::from_details(&details);
        assert_eq!(ids(&board), vec!["s1", "s2"]);
        assert_eq!(board.is_present("s2"), Some(true));
        assert_eq!(board.entries()[1].observations, "trouxe atestado");
    }

    #[test]
    fn clear_discards_everything() {
        let mut board = PresenceBoard::new();
        board.load(roster());
        board.toggle_all(true);
        board.clear();
        assert!(board.is_empty());
        assert!(board.entries().is_empty());
        assert_eq!(board.is_present("s1"), None);
    }
}
