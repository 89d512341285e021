// ABOUTME: Repair and cleaning codes attached to a container.
// ABOUTME: Tracks completion with timestamp, actor, and notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single repair (or cleaning requirement) line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairCode {
    pub code: String,
    #[serde(default)]
    pub component_code: String,
    #[serde(default)]
    pub location_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub component_description: String,
    #[serde(default)]
    pub location_description: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RepairCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            component_code: String::new(),
            location_code: String::new(),
            description: String::new(),
            component_description: String::new(),
            location_description: String::new(),
            is_completed: false,
            completed_at: None,
            completed_by: None,
            notes: None,
        }
    }

    pub fn mark_completed(&mut self, actor: Option<String>, notes: Option<String>) {
        self.is_completed = true;
        self.completed_at = Some(Utc::now());
        self.completed_by = actor;
        self.notes = notes;
    }

    /// Clear completion and everything recorded with it.
    pub fn mark_incomplete(&mut self) {
        self.is_completed = false;
        self.completed_at = None;
        self.completed_by = None;
        self.notes = None;
    }
}
