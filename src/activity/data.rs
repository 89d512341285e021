// ABOUTME: Transfer and result types exchanged between strategies and the engine.
// ABOUTME: ActivityData carries loaded context; ValidationResult gates submission.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

use crate::directory::ContainerSnapshot;
use crate::record::{Approval, RepairCode};

/// Extras key: commodity carried by the container.
pub const EXTRA_COMMODITY: &str = "commodity";
/// Extras key: free-text cleaning requirement.
pub const EXTRA_CLEANING_REQUIREMENT: &str = "cleaning_requirement";
/// Extras key: activity window start (ISO date).
pub const EXTRA_START_DATE: &str = "start_date";
/// Extras key: activity window end (ISO date).
pub const EXTRA_END_DATE: &str = "end_date";
/// Extras key: the activity a survey reviews.
pub const EXTRA_REVIEW_TARGET: &str = "review_target";

/// Context loaded for one activity session, applied once and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityData {
    pub is_approved: bool,
    pub approval_date: Option<NaiveDate>,
    pub approved_by: Option<String>,
    pub repair_codes: Vec<RepairCode>,
    pub description: String,
    pub extras: BTreeMap<String, String>,
}

impl ActivityData {
    pub fn from_snapshot(snapshot: ContainerSnapshot) -> Self {
        let mut extras = BTreeMap::new();
        if let Some(commodity) = snapshot.commodity {
            extras.insert(EXTRA_COMMODITY.to_string(), commodity);
        }
        if let Some(requirement) = snapshot.cleaning_requirement {
            extras.insert(EXTRA_CLEANING_REQUIREMENT.to_string(), requirement);
        }

        Self {
            is_approved: snapshot.is_approved,
            approval_date: snapshot.approval_date,
            approved_by: snapshot.approved_by,
            repair_codes: snapshot.repair_codes,
            description: snapshot.description.unwrap_or_default(),
            extras,
        }
    }

    pub fn from_approval(approval: &Approval, description: impl Into<String>) -> Self {
        Self {
            is_approved: approval.is_approved,
            approval_date: approval.approval_date,
            approved_by: approval.approved_by.clone(),
            repair_codes: Vec::new(),
            description: description.into(),
            extras: BTreeMap::new(),
        }
    }

    pub fn approval(&self) -> Approval {
        Approval {
            is_approved: self.is_approved,
            approval_date: self.approval_date,
            approved_by: self.approved_by.clone(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extras.insert(key.to_string(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// An extra holding an ISO date; malformed values read as absent.
    pub fn extra_date(&self, key: &str) -> Option<NaiveDate> {
        self.extra(key).and_then(|s| s.parse().ok())
    }

    /// Imported codes, each reset to not completed.
    pub fn take_codes_reset(&mut self) -> Vec<RepairCode> {
        let mut codes = std::mem::take(&mut self.repair_codes);
        codes.iter_mut().for_each(RepairCode::mark_incomplete);
        codes
    }
}

/// Gates the caller must explicitly accept before a submission proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfirmationKind {
    /// Some imported cleaning requirements are not marked completed.
    IncompleteCleaningRequirements,
    /// The work has not been approved yet.
    NotApproved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub kind: ConfirmationKind,
    pub message: String,
}

/// Outcome of checking a session's state before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
    NeedsConfirmation(Confirmation),
}

impl ValidationResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationResult::Invalid(message.into())
    }

    pub fn confirm(kind: ConfirmationKind, message: impl Into<String>) -> Self {
        ValidationResult::NeedsConfirmation(Confirmation {
            kind,
            message: message.into(),
        })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Message to show the user; empty for a valid result.
    pub fn error_message(&self) -> &str {
        match self {
            ValidationResult::Valid => "",
            ValidationResult::Invalid(message) => message,
            ValidationResult::NeedsConfirmation(confirmation) => &confirmation.message,
        }
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match self {
            ValidationResult::NeedsConfirmation(confirmation) => Some(confirmation),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResult::Valid => write!(f, "valid"),
            other => write!(f, "{}", other.error_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContainerNumber;

    #[test]
    fn snapshot_fields_land_in_extras() {
        let mut snapshot =
            ContainerSnapshot::new(ContainerNumber::parse("EFGH0000002").unwrap(), "ACME");
        snapshot.commodity = Some("Cocoa beans".to_string());
        snapshot.cleaning_requirement = Some("Sweep".to_string());

        let data = ActivityData::from_snapshot(snapshot);
        assert_eq!(data.extra(EXTRA_COMMODITY), Some("Cocoa beans"));
        assert_eq!(data.extra(EXTRA_CLEANING_REQUIREMENT), Some("Sweep"));
        assert!(data.description.is_empty());
    }

    #[test]
    fn imported_codes_are_reset() {
        let mut code = RepairCode::new("DT01");
        code.mark_completed(None, None);
        let mut data = ActivityData {
            repair_codes: vec![code],
            ..Default::default()
        };

        let codes = data.take_codes_reset();
        assert!(!codes[0].is_completed);
        assert!(data.repair_codes.is_empty());
    }

    #[test]
    fn extra_date_ignores_garbage() {
        let data = ActivityData::default()
            .with_extra(EXTRA_START_DATE, "2026-10-19")
            .with_extra(EXTRA_END_DATE, "someday");
        assert_eq!(
            data.extra_date(EXTRA_START_DATE),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
        assert_eq!(data.extra_date(EXTRA_END_DATE), None);
    }

    #[test]
    fn validation_messages() {
        assert!(ValidationResult::Valid.is_valid());
        assert_eq!(ValidationResult::Valid.error_message(), "");

        let invalid = ValidationResult::invalid("missing photo");
        assert!(!invalid.is_valid());
        assert_eq!(invalid.error_message(), "missing photo");

        let gate = ValidationResult::confirm(ConfirmationKind::NotApproved, "not approved");
        assert!(!gate.is_valid());
        assert_eq!(
            gate.confirmation().map(|c| c.kind),
            Some(ConfirmationKind::NotApproved)
        );
    }
}
