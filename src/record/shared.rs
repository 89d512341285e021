// ABOUTME: Shared handle to a live container record.
// ABOUTME: Sessions read and commit through it; the lock never spans an await.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::ContainerRecord;
use crate::types::ContainerNumber;

/// Cheaply clonable handle to the one live copy of a container record.
#[derive(Clone)]
pub struct SharedRecord {
    number: ContainerNumber,
    inner: Arc<Mutex<ContainerRecord>>,
}

impl SharedRecord {
    pub fn new(record: ContainerRecord) -> Self {
        Self {
            number: record.number().clone(),
            inner: Arc::new(Mutex::new(record)),
        }
    }

    pub fn number(&self) -> &ContainerNumber {
        &self.number
    }

    /// Clone the current state of the record.
    pub fn snapshot(&self) -> ContainerRecord {
        self.inner.lock().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&ContainerRecord) -> R) -> R {
        f(&self.inner.lock())
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ContainerRecord) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Whether both handles point at the same live record.
    pub fn same_record(&self, other: &SharedRecord) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SharedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRecord")
            .field("number", &self.number)
            .finish()
    }
}
