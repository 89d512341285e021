// ABOUTME: Workflow engine driving activity sessions with the typestate pattern.
// ABOUTME: Exports the engine, session states, errors, and status events.

mod engine;
mod error;
mod events;
mod script;
mod session;

pub use engine::{DEFAULT_EVENT_CAPACITY, WorkflowEngine};
pub use error::{SubmitError, WorkflowError};
pub use events::StatusChanged;
pub use script::{ReviewChoice, ScriptPhoto, SessionScript};
pub use session::{Accepted, Completed, Loaded, SubmitResult, ValidateResult, WorkflowSession};
