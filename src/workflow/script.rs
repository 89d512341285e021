// ABOUTME: Scripted session edits read from YAML, for non-interactive submission.
// ABOUTME: Applies photos, dates, review decision, and code completions to a session.

use chrono::NaiveDate;
use serde::Deserialize;

use super::session::{Loaded, WorkflowSession};
use crate::activity::{CleaningSegment, CodeCompletion, Photo};

/// Edits a user would make in a session, recorded up front.
///
/// ```yaml
/// photos:
///   - uri: top.jpg
///     segment: top-outside
///   - uri: plate.jpg
/// start_date: 2026-10-01
/// end_date: 2026-10-03
/// decision: reject
/// remark: dents on the back panel
/// completed_codes: [0, 1]
/// actor: j.doe
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionScript {
    pub photos: Vec<ScriptPhoto>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub decision: Option<ReviewChoice>,
    pub remark: Option<String>,
    /// Indexes into the activity's imported code list.
    pub completed_codes: Vec<usize>,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptPhoto {
    pub uri: String,
    #[serde(default)]
    pub segment: Option<CleaningSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewChoice {
    Accept,
    Reject,
}

impl SessionScript {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Apply the edits in order. Returns code indexes that could not be
    /// toggled.
    pub fn apply(&self, session: &mut WorkflowSession<Loaded>) -> Vec<usize> {
        let state = session.state_mut();
        for photo in &self.photos {
            state.add_photo(match photo.segment {
                Some(segment) => Photo::segment(segment, &photo.uri),
                None => Photo::general(&photo.uri),
            });
        }

        if self.start_date.is_some() || self.end_date.is_some() {
            let start = self.start_date.unwrap_or(state.start_date);
            let end = self.end_date.unwrap_or(state.end_date);
            state.set_dates(start, end);
        }

        match self.decision {
            Some(ReviewChoice::Accept) => state.review_mut().set_accept(true),
            Some(ReviewChoice::Reject) => {
                let review = state.review_mut();
                review.set_reject(true);
                review.set_remark(self.remark.clone());
            }
            None => {}
        }

        self.completed_codes
            .iter()
            .copied()
            .filter(|&index| {
                !session.toggle_code(
                    index,
                    CodeCompletion::Completed {
                        actor: self.actor.clone(),
                        notes: None,
                    },
                )
            })
            .collect()
    }
}
