// ABOUTME: In-memory Container Directory backed by fixture data.
// ABOUTME: Serves snapshots loaded from YAML for offline use and tests.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{ContainerDirectory, ContainerSnapshot, DirectoryError, ExistsResult};
use crate::record::RepairCode;
use crate::types::ContainerNumber;

/// Cleaning-specific data for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningDetails {
    #[serde(default)]
    pub commodity: Option<String>,
    #[serde(default)]
    pub cleaning_requirement: Option<String>,
    #[serde(default)]
    pub codes: Vec<RepairCode>,
}

/// One entry of a fixture file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureContainer {
    #[serde(flatten)]
    pub snapshot: ContainerSnapshot,
    #[serde(default)]
    pub cleaning: Option<CleaningDetails>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    containers: Vec<FixtureContainer>,
}

/// Directory that answers from memory.
#[derive(Debug, Default)]
pub struct FixtureDirectory {
    containers: HashMap<ContainerNumber, FixtureContainer>,
}

impl FixtureDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a fixture document of the form `containers: [...]`.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let file: FixtureFile = serde_yaml::from_str(yaml)?;
        let mut directory = Self::new();
        for entry in file.containers {
            directory.insert(entry);
        }
        Ok(directory)
    }

    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| DirectoryError::Fixture {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| DirectoryError::Fixture {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn insert(&mut self, entry: FixtureContainer) {
        self.containers
            .insert(entry.snapshot.container_number.clone(), entry);
    }

    /// Add a container without cleaning details.
    pub fn with_container(mut self, snapshot: ContainerSnapshot) -> Self {
        self.insert(FixtureContainer {
            snapshot,
            cleaning: None,
        });
        self
    }

    /// Attach cleaning details to a container already present.
    pub fn with_cleaning(mut self, number: &ContainerNumber, details: CleaningDetails) -> Self {
        if let Some(entry) = self.containers.get_mut(number) {
            entry.cleaning = Some(details);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

#[async_trait]
impl ContainerDirectory for FixtureDirectory {
    async fn check_exists(&self, number: &ContainerNumber) -> Result<ExistsResult, DirectoryError> {
        Ok(if self.containers.contains_key(number) {
            ExistsResult {
                is_success: true,
                message: format!("container {number} found"),
            }
        } else {
            ExistsResult {
                is_success: false,
                message: format!("container {number} not found"),
            }
        })
    }

    async fn get_container_with_repair_codes(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        Ok(self.containers.get(number).map(|e| e.snapshot.clone()))
    }

    async fn get_container_cleaning_details(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        let Some(entry) = self.containers.get(number) else {
            return Ok(None);
        };
        let Some(cleaning) = &entry.cleaning else {
            return Ok(None);
        };

        let mut snapshot = entry.snapshot.clone();
        if cleaning.commodity.is_some() {
            snapshot.commodity = cleaning.commodity.clone();
        }
        snapshot.cleaning_requirement = cleaning.cleaning_requirement.clone();
        snapshot.repair_codes = cleaning.codes.clone();
        Ok(Some(snapshot))
    }
}
