// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and a scripted Container Directory double.

use async_trait::async_trait;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use yardcheck::directory::{
    CleaningDetails, ContainerDirectory, ContainerSnapshot, DirectoryError, ExistsResult,
    FixtureDirectory,
};
use yardcheck::record::ActivityStatus;
use yardcheck::types::ContainerNumber;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("yardcheck=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn number(raw: &str) -> ContainerNumber {
    ContainerNumber::parse(raw).unwrap()
}

/// Snapshot for `EFGH0000002` with the given base statuses.
#[allow(dead_code)]
pub fn snapshot_with(
    cleaning: ActivityStatus,
    repair: ActivityStatus,
    periodic: ActivityStatus,
) -> ContainerSnapshot {
    let mut snapshot = ContainerSnapshot::new(number("EFGH0000002"), "ACME");
    snapshot.cleaning_status = cleaning;
    snapshot.repair_status = repair;
    snapshot.periodic_status = periodic;
    snapshot
}

/// Directory double answering from a fixture. Cleaning-detail lookups can be
/// made to fail or to stall; every call is counted so tests can prove the
/// directory was never reached.
#[allow(dead_code)]
pub struct ScriptedDirectory {
    inner: FixtureDirectory,
    unreachable: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedDirectory {
    pub fn new(inner: FixtureDirectory) -> Self {
        Self {
            inner,
            unreachable: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_snapshot(snapshot: ContainerSnapshot) -> Self {
        Self::new(FixtureDirectory::new().with_container(snapshot))
    }

    pub fn with_cleaning(snapshot: ContainerSnapshot, details: CleaningDetails) -> Self {
        let number = snapshot.container_number.clone();
        Self::new(
            FixtureDirectory::new()
                .with_container(snapshot)
                .with_cleaning(&number, details),
        )
    }

    /// Cleaning-detail lookups fail as if the service were down. Existence
    /// and master-data lookups still succeed so records can be created.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn before_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn down(&self) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        Err(DirectoryError::Fixture {
            path: "scripted".to_string(),
            message: "directory unreachable".to_string(),
        })
    }
}

#[async_trait]
impl ContainerDirectory for ScriptedDirectory {
    async fn check_exists(&self, number: &ContainerNumber) -> Result<ExistsResult, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.check_exists(number).await
    }

    async fn get_container_with_repair_codes(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_container_with_repair_codes(number).await
    }

    async fn get_container_cleaning_details(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        self.before_call().await;
        if self.unreachable {
            return self.down();
        }
        self.inner.get_container_cleaning_details(number).await
    }
}
