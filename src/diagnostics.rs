// ABOUTME: Diagnostics accumulator for non-fatal warnings during an activity session.
// ABOUTME: Collects warnings that shouldn't fail a load or submit but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings raised while a session loads or submits.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The container directory could not be reached or answered garbage.
    pub fn directory_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DirectoryUnavailable,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Directory lookup failed; the session continues without imported data.
    DirectoryUnavailable,
}
