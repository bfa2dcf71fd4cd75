mod address;
mod event;
mod reconciler;

pub use address::resolve_frontend_address;
pub use event::{Event, EventKind, EventPayload};
pub use reconciler::{ReconcileOutcome, ReconcileStatus, Reconciler};

use crate::state::StorageError;

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("unable to get the load balancer configuration: {0}")]
    Fetch(String),
    #[error("fatal validation error on the existing load balancer configuration: {0}")]
    FatalValidation(String),
    #[error("failed to submit load balancer configuration: {0}")]
    Submit(String),
    #[error("unable to deploy load balancer configuration: {0}")]
    Deployment(String),
    #[error("waiting for the deployment was cancelled")]
    Cancelled,
    #[error("config cache: {0}")]
    Storage(#[from] StorageError),
}
