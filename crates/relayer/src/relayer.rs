//! The services a relay worker acts through and the one way it changes a record.

use std::sync::Arc;

use relay_sm::{
    config::TransferSMCfg,
    duties::TransferDuty,
    events::TransferEvent,
    machine::TransferSM,
    state_machine::StateMachine,
};
use stable_router_db::{errors::DbError, TransferStore};
use stable_router_params::RelayerParams;
use stable_router_primitives::transfer::TransferRecord;
use tracing::{debug, info};

use crate::{
    attestation::AttestationService,
    clock::{Clock, SystemClock},
    destination::DestinationReceiver,
    errors::RelayerResult,
};

/// A committed transition: the record as stored and the duties it calls for.
pub type Applied = (TransferRecord, Vec<TransferDuty>);

/// Everything a relay worker needs to drive transfers.
#[expect(missing_debug_implementations)]
pub struct Relayer {
    pub(crate) store: Arc<dyn TransferStore>,
    pub(crate) attestations: Arc<dyn AttestationService>,
    pub(crate) destination: Arc<dyn DestinationReceiver>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) params: RelayerParams,
    pub(crate) cfg: TransferSMCfg,
}

impl Relayer {
    /// Creates a relayer that reads the wall clock.
    pub fn new(
        store: Arc<dyn TransferStore>,
        attestations: Arc<dyn AttestationService>,
        destination: Arc<dyn DestinationReceiver>,
        params: RelayerParams,
    ) -> Self {
        let cfg = TransferSMCfg::from(&params);

        Self {
            store,
            attestations,
            destination,
            clock: Arc::new(SystemClock),
            params,
            cfg,
        }
    }

    /// Replaces the clock.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self { clock, ..self }
    }

    /// The transfer store.
    pub fn store(&self) -> &Arc<dyn TransferStore> {
        &self.store
    }

    /// The timing parameters.
    pub const fn params(&self) -> &RelayerParams {
        &self.params
    }

    /// Processes `event` against `record` and commits the result if `record` is still the stored
    /// version.
    ///
    /// Returns `None` if another writer advanced the record first. The caller must then drop
    /// whatever it was doing with `record`.
    pub(crate) async fn apply(
        &self,
        record: &TransferRecord,
        event: TransferEvent,
    ) -> RelayerResult<Option<Applied>> {
        let event_name = event.to_string();

        let mut sm = TransferSM::new(record.clone());
        let output = sm.process_event(&self.cfg, event)?;
        let next = sm.into_record();

        match self
            .store
            .compare_and_swap(record.state, record.version, &next)
            .await
        {
            Ok(()) => {
                if next.state != record.state {
                    info!(
                        message_id = %next.message_id,
                        from = %record.state,
                        to = %next.state,
                        event = %event_name,
                        "transfer advanced"
                    );
                }

                Ok(Some((next, output.duties)))
            }
            Err(DbError::StaleTransition { .. }) => {
                debug!(
                    message_id = %record.message_id,
                    state = %record.state,
                    version = %record.version,
                    event = %event_name,
                    "lost the race for the transfer"
                );

                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
