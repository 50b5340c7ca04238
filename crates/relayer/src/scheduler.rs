//! Schedules relay workers over the tracked transfers.

use std::{collections::HashMap, sync::Arc, time::Duration};

use stable_router_primitives::{transfer::TransferState, types::MessageId};
use tokio::{
    sync::{mpsc, Semaphore},
    task::{self, JoinError, JoinSet},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    backoff::restart_delay,
    errors::{RelayerError, RelayerResult},
    relayer::Relayer,
    worker::DriveOutcome,
};

/// Bookkeeping of a transfer that has a worker, running or waiting to restart.
#[derive(Debug, Default)]
struct Flight {
    /// The transfer was scheduled again while its worker was running.
    rerun: bool,

    /// Consecutive runs that stopped before the transfer settled.
    failures: u32,
}

/// Submits transfers to a running [`Scheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::UnboundedSender<MessageId>,
}

impl SchedulerHandle {
    /// Asks the scheduler to drive the transfer of `message_id`.
    ///
    /// Scheduling a transfer that is already being driven makes the scheduler look at it again
    /// once the current worker stops.
    pub fn schedule(&self, message_id: MessageId) -> RelayerResult<()> {
        self.tx
            .send(message_id)
            .map_err(|_| RelayerError::SchedulerStopped)
    }
}

/// Runs one worker per active transfer, at most `concurrency` at a time.
///
/// A worker that stops before its transfer settles, whether on an error or a panic, is restarted
/// after a backoff taken from [`WorkerParams`](stable_router_params::WorkerParams).
#[expect(missing_debug_implementations)]
pub struct Scheduler {
    relayer: Arc<Relayer>,
    concurrency: usize,
    rx: mpsc::UnboundedReceiver<MessageId>,
}

impl Scheduler {
    /// Creates a scheduler and the handle to feed it.
    pub fn new(relayer: Arc<Relayer>, concurrency: usize) -> (Self, SchedulerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();

        let scheduler = Self {
            relayer,
            concurrency: concurrency.max(1),
            rx,
        };

        (scheduler, SchedulerHandle { tx })
    }

    /// Resumes every active transfer in the store and then drives scheduled transfers until
    /// `cancel` fires.
    ///
    /// Workers still running at cancellation are aborted. Their records are left in a state from
    /// which the next start resumes them.
    pub async fn run(mut self, cancel: CancellationToken) -> RelayerResult<()> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();
        let mut tasks: HashMap<task::Id, MessageId> = HashMap::new();
        let mut in_flight: HashMap<MessageId, Flight> = HashMap::new();

        let active = self
            .relayer
            .store()
            .transfers_in_states(&TransferState::ACTIVE)
            .await?;

        info!(count = %active.len(), "resuming active transfers");

        for record in active {
            in_flight.insert(record.message_id, Flight::default());
            let id = self.spawn(&mut workers, &semaphore, record.message_id, Duration::ZERO);
            tasks.insert(id, record.message_id);
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                Some(message_id) = self.rx.recv() => {
                    match in_flight.get_mut(&message_id) {
                        Some(flight) => flight.rerun = true,
                        None => {
                            in_flight.insert(message_id, Flight::default());
                            let id =
                                self.spawn(&mut workers, &semaphore, message_id, Duration::ZERO);
                            tasks.insert(id, message_id);
                        }
                    }
                }

                Some(joined) = workers.join_next_with_id() => {
                    let (id, result) = match joined {
                        Ok((id, result)) => (id, Ok(result)),
                        Err(err) => (err.id(), Err(err)),
                    };

                    let Some(message_id) = tasks.remove(&id) else {
                        continue;
                    };

                    if let Some(delay) = self.after_worker(&mut in_flight, message_id, result) {
                        let id = self.spawn(&mut workers, &semaphore, message_id, delay);
                        tasks.insert(id, message_id);
                    }
                }
            }
        }

        info!(in_flight = %workers.len(), "stopping relay workers");
        workers.shutdown().await;

        Ok(())
    }

    /// Updates the bookkeeping of a transfer whose worker stopped and returns the delay after
    /// which the transfer must be driven again, if it must.
    ///
    /// A worker that stopped before its transfer settled is always restarted, so a transfer
    /// only leaves the scheduler once it is terminal or driven by another writer.
    fn after_worker(
        &self,
        in_flight: &mut HashMap<MessageId, Flight>,
        message_id: MessageId,
        result: Result<RelayerResult<DriveOutcome>, JoinError>,
    ) -> Option<Duration> {
        let flight = in_flight.entry(message_id).or_default();

        let failure = match result {
            Ok(Ok(outcome)) => {
                match outcome {
                    DriveOutcome::Settled(state) => {
                        debug!(%message_id, %state, "worker finished");
                    }
                    DriveOutcome::Abandoned => {
                        debug!(%message_id, "worker abandoned the transfer");
                    }
                }

                if std::mem::take(&mut flight.rerun) {
                    flight.failures = 0;
                    return Some(Duration::ZERO);
                }

                in_flight.remove(&message_id);
                return None;
            }
            Ok(Err(RelayerError::UnknownTransfer(_))) => {
                warn!(%message_id, "scheduled transfer is not tracked");
                in_flight.remove(&message_id);
                return None;
            }
            Ok(Err(err)) => err.to_string(),
            Err(err) => {
                error!(%message_id, %err, "relay worker panicked");
                err.to_string()
            }
        };

        flight.rerun = false;
        flight.failures = flight.failures.saturating_add(1);
        let delay = restart_delay(&self.relayer.params().worker, flight.failures);

        warn!(
            %message_id,
            error = %failure,
            failures = %flight.failures,
            ?delay,
            "worker stopped before the transfer settled, restarting"
        );

        Some(delay)
    }

    fn spawn(
        &self,
        workers: &mut JoinSet<RelayerResult<DriveOutcome>>,
        semaphore: &Arc<Semaphore>,
        message_id: MessageId,
        delay: Duration,
    ) -> task::Id {
        let relayer = self.relayer.clone();
        let semaphore = semaphore.clone();

        workers
            .spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| RelayerError::SchedulerStopped)?;

                relayer.drive(message_id).await
            })
            .id()
    }
}
