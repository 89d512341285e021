// ABOUTME: Container Directory collaborator: the external source of container data.
// ABOUTME: Defines the lookup trait plus HTTP and in-memory fixture implementations.

mod envelope;
mod error;
mod fixture;
mod http;
mod snapshot;

pub use envelope::{Envelope, ExistsResult};
pub use error::{DirectoryError, DirectoryErrorKind};
pub use fixture::{CleaningDetails, FixtureContainer, FixtureDirectory};
pub use http::{DEFAULT_TIMEOUT, HttpDirectory};
pub use snapshot::ContainerSnapshot;

use async_trait::async_trait;

use crate::types::ContainerNumber;

/// Lookups the workflow needs from the Container Directory.
///
/// Snapshot calls return `Ok(None)` when the directory answers but has no
/// usable content (a non-success envelope or an empty `content`).
#[async_trait]
pub trait ContainerDirectory: Send + Sync {
    /// Ask whether the directory knows a container.
    async fn check_exists(&self, number: &ContainerNumber) -> Result<ExistsResult, DirectoryError>;

    /// Container master data together with its open repair codes.
    async fn get_container_with_repair_codes(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError>;

    /// Container master data with cleaning codes and requirement text.
    async fn get_container_cleaning_details(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError>;
}
