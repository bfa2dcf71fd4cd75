use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, span, warn, Instrument, Level};
use typed_builder::TypedBuilder;

use crate::{
    controllers::{Event, ReconcileStatus, Reconciler},
    Result,
};

/// Feeds events to the [`Reconciler`] one at a time until the event channel closes or shutdown is requested.
#[derive(TypedBuilder)]
pub struct ReconcileService {
    reconciler: Arc<Reconciler>,
    event_receiver: mpsc::Receiver<Event>,
    shutdown: CancellationToken,
}

impl ReconcileService {
    pub async fn start(self) -> Result<()> {
        let mut event_receiver = self.event_receiver;
        loop {
            tokio::select! {
                event = event_receiver.recv() => {
                    let Some(event) = event else {
                        info!("Event channel closed");
                        break;
                    };
                    let span = span!(Level::INFO, "ReconcileService", id = %event.id);
                    let reconciler = Arc::clone(&self.reconciler);
                    match reconciler.process(&event, &self.shutdown).instrument(span).await {
                        Ok(outcome) => {
                            if outcome.status == ReconcileStatus::Deployed {
                                info!("Reconciled {event} with {} diagnostics", outcome.diagnostics.len());
                            }
                        },
                        Err(e) => warn!("Unable to reconcile {event}: {e}"),
                    }
                },
                () = self.shutdown.cancelled() => {
                    info!("Reconcile service shutting down");
                    break;
                },
            }
        }
        Ok(())
    }
}
