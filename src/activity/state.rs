// ABOUTME: Editable per-session state threaded through the workflow engine.
// ABOUTME: Holds photos, dates, imported requirements, and the review decision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::data::ConfirmationKind;
use crate::record::{ActivityKind, Approval, RepairCode};

/// Fixed areas of a container that each need a cleaning photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningSegment {
    TopOutside,
    FrontUpperHalf,
    FrontLowerHalf,
    BackUpperHalf,
    BackLowerHalf,
}

impl CleaningSegment {
    pub const ALL: [CleaningSegment; 5] = [
        CleaningSegment::TopOutside,
        CleaningSegment::FrontUpperHalf,
        CleaningSegment::FrontLowerHalf,
        CleaningSegment::BackUpperHalf,
        CleaningSegment::BackLowerHalf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CleaningSegment::TopOutside => "Top Outside",
            CleaningSegment::FrontUpperHalf => "Front Upper Half",
            CleaningSegment::FrontLowerHalf => "Front Lower Half",
            CleaningSegment::BackUpperHalf => "Back Upper Half",
            CleaningSegment::BackLowerHalf => "Back Lower Half",
        }
    }
}

impl fmt::Display for CleaningSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a photo belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "slot", content = "segment")]
pub enum PhotoSlot {
    Segment(CleaningSegment),
    General,
}

/// Reference to a captured photo. Capture and storage happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub slot: PhotoSlot,
    pub uri: String,
}

impl Photo {
    pub fn general(uri: impl Into<String>) -> Self {
        Self {
            slot: PhotoSlot::General,
            uri: uri.into(),
        }
    }

    pub fn segment(segment: CleaningSegment, uri: impl Into<String>) -> Self {
        Self {
            slot: PhotoSlot::Segment(segment),
            uri: uri.into(),
        }
    }
}

/// Accept/reject pair of a survey review. At most one side is ever set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDecision {
    accept: bool,
    reject: bool,
    remark: Option<String>,
}

impl ReviewDecision {
    pub fn accept(&self) -> bool {
        self.accept
    }

    pub fn reject(&self) -> bool {
        self.reject
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    /// Setting accept clears reject (and with it the remark).
    pub fn set_accept(&mut self, value: bool) {
        self.accept = value;
        if value {
            self.set_reject(false);
        }
    }

    /// Setting reject clears accept; clearing reject drops the remark.
    pub fn set_reject(&mut self, value: bool) {
        self.reject = value;
        if value {
            self.accept = false;
        } else {
            self.remark = None;
        }
    }

    /// Store the rejection remark. Ignored unless reject is selected.
    pub fn set_remark(&mut self, remark: Option<String>) {
        if !self.reject {
            return;
        }
        self.remark = remark.filter(|r| !r.trim().is_empty());
    }

    /// Exactly one of accept/reject is selected.
    pub fn is_decided(&self) -> bool {
        self.accept != self.reject
    }
}

/// Everything a user edits during one activity session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityState {
    activity: ActivityKind,
    pub has_data: bool,
    pub approval: Approval,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cleaning_requirements: Vec<RepairCode>,
    pub cleaning_requirement_text: Option<String>,
    /// Remark left by the last rejected survey, for reference only.
    pub previous_remark: Option<String>,
    photos: Vec<Photo>,
    review: ReviewDecision,
    confirmed: BTreeSet<ConfirmationKind>,
}

impl ActivityState {
    pub fn new(activity: ActivityKind, today: NaiveDate) -> Self {
        Self {
            activity,
            has_data: false,
            approval: Approval::default(),
            description: String::new(),
            start_date: today,
            end_date: today,
            cleaning_requirements: Vec::new(),
            cleaning_requirement_text: None,
            previous_remark: None,
            photos: Vec::new(),
            review: ReviewDecision::default(),
            confirmed: BTreeSet::new(),
        }
    }

    pub fn activity(&self) -> ActivityKind {
        self.activity
    }

    pub fn add_photo(&mut self, photo: Photo) {
        self.photos.push(photo);
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<Photo> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Cleaning segments that have no photo yet, in fixed segment order.
    pub fn missing_segments(&self) -> Vec<CleaningSegment> {
        CleaningSegment::ALL
            .iter()
            .copied()
            .filter(|segment| {
                !self
                    .photos
                    .iter()
                    .any(|p| p.slot == PhotoSlot::Segment(*segment))
            })
            .collect()
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = start;
        self.end_date = end;
    }

    pub fn review(&self) -> &ReviewDecision {
        &self.review
    }

    pub fn review_mut(&mut self) -> &mut ReviewDecision {
        &mut self.review
    }

    /// Record that the user accepted a confirmation gate.
    pub fn confirm(&mut self, kind: ConfirmationKind) {
        self.confirmed.insert(kind);
    }

    pub fn is_confirmed(&self, kind: ConfirmationKind) -> bool {
        self.confirmed.contains(&kind)
    }

    pub fn incomplete_requirements(&self) -> usize {
        self.cleaning_requirements
            .iter()
            .filter(|code| !code.is_completed)
            .count()
    }
}
