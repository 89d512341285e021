// ABOUTME: Container snapshot as delivered by the Container Directory.
// ABOUTME: Carries master data, approval metadata, codes, and known statuses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{ActivityStatus, Approval, ContainerRecord, RepairCode};
use crate::types::ContainerNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    pub container_number: ContainerNumber,
    #[serde(default)]
    pub customer_code: String,
    #[serde(default)]
    pub commodity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub approval_date: Option<NaiveDate>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub repair_codes: Vec<RepairCode>,
    #[serde(default)]
    pub cleaning_requirement: Option<String>,
    #[serde(default)]
    pub cleaning_status: ActivityStatus,
    #[serde(default)]
    pub repair_status: ActivityStatus,
    #[serde(default)]
    pub periodic_status: ActivityStatus,
    #[serde(default)]
    pub survey_status: ActivityStatus,
}

impl ContainerSnapshot {
    pub fn new(container_number: ContainerNumber, customer_code: impl Into<String>) -> Self {
        Self {
            container_number,
            customer_code: customer_code.into(),
            commodity: None,
            description: None,
            is_approved: false,
            approval_date: None,
            approved_by: None,
            repair_codes: Vec::new(),
            cleaning_requirement: None,
            cleaning_status: ActivityStatus::NotFilled,
            repair_status: ActivityStatus::NotFilled,
            periodic_status: ActivityStatus::NotFilled,
            survey_status: ActivityStatus::NotFilled,
        }
    }

    pub fn approval(&self) -> Approval {
        Approval {
            is_approved: self.is_approved,
            approval_date: self.approval_date,
            approved_by: self.approved_by.clone(),
        }
    }

    /// Build a fresh record from this snapshot.
    pub fn into_record(self) -> ContainerRecord {
        let approval = self.approval();
        let mut record = ContainerRecord::with_statuses(
            self.container_number,
            self.customer_code,
            [
                self.cleaning_status,
                self.repair_status,
                self.periodic_status,
                self.survey_status,
            ],
        );
        record.commodity = self.commodity;
        record.approval = approval;
        record.repair_codes = self.repair_codes;
        record
    }
}
