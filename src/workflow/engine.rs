// ABOUTME: Workflow engine: record registry, session factory, and event hub.
// ABOUTME: Holds the directory handle and the in-flight submission set.

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::error::WorkflowError;
use super::events::StatusChanged;
use super::session::{Loaded, WorkflowSession};
use crate::activity::{ActivitySettings, ActivityState, LoadContext, strategy_for};
use crate::config::{Config, DirectorySource};
use crate::diagnostics::Diagnostics;
use crate::directory::{ContainerDirectory, FixtureDirectory, HttpDirectory};
use crate::record::{ActivityKind, ContainerRecord, Order, SharedRecord};
use crate::types::ContainerNumber;

/// Default buffer of the status-change channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

pub(super) type SubmitKey = (ContainerNumber, ActivityKind);

/// State shared between the engine and the sessions it opened.
pub(super) struct EngineShared {
    pub(super) directory: Arc<dyn ContainerDirectory>,
    pub(super) settings: ActivitySettings,
    records: Mutex<HashMap<ContainerNumber, SharedRecord>>,
    in_flight: Mutex<HashSet<SubmitKey>>,
    pub(super) events: broadcast::Sender<StatusChanged>,
}

impl EngineShared {
    /// Claim the busy flag for one container/activity pair.
    pub(super) fn claim(self: &Arc<Self>, key: SubmitKey) -> Option<InFlightGuard> {
        if !self.in_flight.lock().insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            shared: Arc::clone(self),
            key,
        })
    }

    pub(super) fn publish(&self, events: &[StatusChanged]) {
        for event in events {
            // Err only means nobody is listening.
            let _ = self.events.send(event.clone());
        }
    }
}

/// Releases the busy flag when dropped.
pub(super) struct InFlightGuard {
    shared: Arc<EngineShared>,
    key: SubmitKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.shared.in_flight.lock().remove(&self.key);
    }
}

/// Drives containers through their activities.
///
/// Cloning is cheap and every clone shares the same records and events.
#[derive(Clone)]
pub struct WorkflowEngine {
    shared: Arc<EngineShared>,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("settings", &self.shared.settings)
            .field("records", &self.shared.records.lock().len())
            .finish()
    }
}

impl WorkflowEngine {
    pub fn new(directory: Arc<dyn ContainerDirectory>) -> Self {
        Self::with_options(directory, ActivitySettings::default(), DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_options(
        directory: Arc<dyn ContainerDirectory>,
        settings: ActivitySettings,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            shared: Arc::new(EngineShared {
                directory,
                settings,
                records: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashSet::new()),
                events,
            }),
        }
    }

    /// Build an engine whose directory and tunables come from `config`.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let directory: Arc<dyn ContainerDirectory> = match config.directory_source()? {
            DirectorySource::Http { url, timeout } => {
                tracing::debug!("using container directory at {}", url);
                Arc::new(HttpDirectory::new(&url, timeout)?)
            }
            DirectorySource::Fixture(path) => {
                tracing::debug!("using fixture directory {}", path.display());
                Arc::new(FixtureDirectory::load(&path)?)
            }
        };
        let settings = ActivitySettings {
            periodic_interval_months: config.periodic.interval_months,
        };
        Ok(Self::with_options(directory, settings, config.events.capacity))
    }

    /// Receive a `StatusChanged` for every committed status change.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChanged> {
        self.shared.events.subscribe()
    }

    /// The cached record for `number`, if it was looked up or registered.
    pub fn record(&self, number: &ContainerNumber) -> Option<SharedRecord> {
        self.shared.records.lock().get(number).cloned()
    }

    /// Cached container numbers in sorted order.
    pub fn containers(&self) -> Vec<ContainerNumber> {
        let mut numbers: Vec<_> = self.shared.records.lock().keys().cloned().collect();
        numbers.sort();
        numbers
    }

    /// Validate `raw`, confirm the directory knows it, and return its record.
    ///
    /// Invalid numbers never reach the directory. A cached record is returned
    /// as is; use [`refresh`](Self::refresh) to re-fetch.
    pub async fn lookup(&self, raw: &str) -> Result<SharedRecord, WorkflowError> {
        let number = ContainerNumber::parse(raw)?;
        if let Some(record) = self.record(&number) {
            return Ok(record);
        }

        let exists = self.shared.directory.check_exists(&number).await?;
        if !exists.is_success {
            return Err(WorkflowError::NotFound {
                number,
                message: exists.message,
            });
        }

        let record = self.fetch(&number).await?;
        tracing::debug!("loaded container {} from directory", number);
        Ok(self.cache(record))
    }

    /// Look up every container of an order, stopping at the first failure.
    pub async fn lookup_order(&self, order: &Order) -> Result<Vec<SharedRecord>, WorkflowError> {
        let mut records = Vec::with_capacity(order.container_count());
        for number in order.containers() {
            records.push(self.lookup(number.as_str()).await?);
        }
        Ok(records)
    }

    /// Add a container the directory does not know about.
    pub fn register(
        &self,
        raw: &str,
        customer_code: &str,
        commodity: Option<String>,
    ) -> Result<SharedRecord, WorkflowError> {
        let number = ContainerNumber::parse(raw)?;
        let mut records = self.shared.records.lock();
        if records.contains_key(&number) {
            return Err(WorkflowError::AlreadyRegistered(number));
        }

        let mut record = ContainerRecord::new(number.clone(), customer_code);
        record.commodity = commodity;
        let shared = SharedRecord::new(record);
        records.insert(number.clone(), shared.clone());
        tracing::info!("registered container {}", number);
        Ok(shared)
    }

    /// Replace a record's contents with a fresh directory fetch.
    ///
    /// The live record is updated in place so open sessions see the new
    /// data. Status differences are broadcast like any other change.
    pub async fn refresh(&self, number: &ContainerNumber) -> Result<SharedRecord, WorkflowError> {
        let fresh = self.fetch(number).await?;
        let Some(existing) = self.record(number) else {
            return Ok(self.cache(fresh));
        };

        let events: Vec<StatusChanged> = existing.update(|live| {
            let changes = fresh.status_changes_since(live);
            *live = fresh;
            changes
                .into_iter()
                .map(|change| StatusChanged::new(number.clone(), change))
                .collect()
        });
        self.shared.publish(&events);
        tracing::debug!("refreshed container {} ({} status changes)", number, events.len());
        Ok(existing)
    }

    /// Open a session for one activity of `record` and load its data.
    pub async fn open(
        &self,
        kind: ActivityKind,
        record: &SharedRecord,
    ) -> Result<WorkflowSession<Loaded>, WorkflowError> {
        self.open_with_token(kind, record, CancellationToken::new())
            .await
    }

    /// Like [`open`](Self::open), with a caller-owned cancellation token.
    ///
    /// If the token fires while data is loading, nothing is applied and the
    /// call returns [`WorkflowError::Cancelled`].
    pub async fn open_with_token(
        &self,
        kind: ActivityKind,
        record: &SharedRecord,
        token: CancellationToken,
    ) -> Result<WorkflowSession<Loaded>, WorkflowError> {
        let strategy = strategy_for(kind, &self.shared.settings);
        let today = today();
        let mut state = ActivityState::new(kind, today);
        let mut diagnostics = Diagnostics::default();
        tracing::debug!("opening {} session for {}", kind, record.number());

        let snapshot = record.snapshot();
        let ctx = LoadContext {
            record: &snapshot,
            directory: self.shared.directory.as_ref(),
            today,
            diagnostics: &mut diagnostics,
        };
        let data = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            data = strategy.load_activity_data(ctx) => Some(data),
        };
        let Some(data) = data else {
            tracing::debug!("{} session for {} cancelled while loading", kind, record.number());
            return Err(WorkflowError::Cancelled);
        };

        match data {
            Some(data) => {
                record.update(|live| strategy.apply_activity_data(live, &mut state, data));
                state.has_data = true;
                tracing::debug!("{} data applied to {}", kind, record.number());
            }
            None => {
                tracing::info!("no {} data for {}, using defaults", kind, record.number());
            }
        }

        Ok(WorkflowSession::loaded(
            Arc::clone(&self.shared),
            strategy,
            record.clone(),
            state,
            diagnostics,
            token,
        ))
    }

    async fn fetch(&self, number: &ContainerNumber) -> Result<ContainerRecord, WorkflowError> {
        match self
            .shared
            .directory
            .get_container_with_repair_codes(number)
            .await?
        {
            Some(snapshot) => Ok(snapshot.into_record()),
            None => Err(WorkflowError::NotFound {
                number: number.clone(),
                message: "directory returned no container data".to_string(),
            }),
        }
    }

    fn cache(&self, record: ContainerRecord) -> SharedRecord {
        self.shared
            .records
            .lock()
            .entry(record.number().clone())
            .or_insert_with(|| SharedRecord::new(record))
            .clone()
    }

    #[cfg(test)]
    pub(super) fn shared(&self) -> &Arc<EngineShared> {
        &self.shared
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
