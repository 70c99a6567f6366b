//! Attendance records (class sessions) and per-student presence entries.
//!
//! A [`ClassSession`] is created when a teacher submits a roster for a date
//! and later updated in place. Its [`PresenceEntry`] list travels to the
//! server as a JSON string inside a multipart form, so the serialized field
//! names and order here are part of the wire contract.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::student::StudentSummary;
use crate::types::EntityId;
use crate::validation::IdFormat;

/// Maximum length of a per-student observation note.
pub const MAX_OBSERVATION_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Presence entries
// ---------------------------------------------------------------------------

/// One student's attendance flag for one class session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    pub student_id: EntityId,
    pub is_present: bool,
    #[serde(default)]
    pub observations: String,
}

impl PresenceEntry {
    pub fn new(student_id: impl Into<EntityId>, is_present: bool) -> Self {
        Self {
            student_id: student_id.into(),
            is_present,
            observations: String::new(),
        }
    }
}

/// Check a submission list before it leaves the client.
///
/// Every id must satisfy `format`, ids must be unique, and notes must fit
/// [`MAX_OBSERVATION_LEN`]. The presence flag is a `bool` so it is always
/// well-formed.
pub fn validate_entries(entries: &[PresenceEntry], format: IdFormat) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !format.accepts(&entry.student_id) {
            return Err(CoreError::Validation(format!(
                "Student id '{}' must be {}",
                entry.student_id,
                format.describe()
            )));
        }
        if !seen.insert(entry.student_id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Student '{}' appears more than once in the roster",
                entry.student_id
            )));
        }
        if entry.observations.chars().count() > MAX_OBSERVATION_LEN {
            return Err(CoreError::Validation(format!(
                "Observations for student '{}' exceed {MAX_OBSERVATION_LEN} characters",
                entry.student_id
            )));
        }
    }
    Ok(())
}

/// Serialize entries into the compact JSON string sent as the `students`
/// multipart field.
pub fn encode_entries(entries: &[PresenceEntry]) -> Result<String, CoreError> {
    serde_json::to_string(entries)
        .map_err(|e| CoreError::Internal(format!("Failed to encode presence entries: {e}")))
}

// ---------------------------------------------------------------------------
// Class sessions
// ---------------------------------------------------------------------------

/// Name and avatar of the student attached to an attendance detail row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailStudent {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A persisted presence entry as returned inside a [`ClassSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    pub student_id: EntityId,
    pub is_present: bool,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub student: Option<DetailStudent>,
}

impl AttendanceDetail {
    /// Roster row for this detail; unnamed students render with an empty name.
    pub fn student_summary(&self) -> StudentSummary {
        StudentSummary {
            id: self.student_id.clone(),
            name: self
                .student
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            avatar_url: self.student.as_ref().and_then(|s| s.avatar_url.clone()),
        }
    }
}

/// An attendance record for one class on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: EntityId,
    #[serde(default)]
    pub class_id: Option<EntityId>,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub attendance_details: Vec<AttendanceDetail>,
}

impl ClassSession {
    pub fn present_count(&self) -> usize {
        self.attendance_details.iter().filter(|d| d.is_present).count()
    }
}

/// Accept either `YYYY-MM-DD` or a full RFC 3339 timestamp and keep the day.
fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).map_err(serde::de::Error::custom)
}

/// Parse the calendar day from a date or timestamp string.
pub fn parse_day(raw: &str) -> Result<NaiveDate, CoreError> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| CoreError::Validation(format!("Invalid date '{raw}': {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
