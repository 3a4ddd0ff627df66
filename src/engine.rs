use hourglass_rs::SafeTimeProvider;
use tracing::{debug, warn};

use crate::arrears::{aggregate_client_arrears, overdue_installments, ClientOverdueInfo};
use crate::errors::{Result, ScheduleError};
use crate::events::{Event, EventStore};
use crate::notify::ArrearsNotifier;
use crate::redistribution::{merge_absorbed, plan_redistribution, RedistributionOutcome};
use crate::schedule::{schedule_for_sale, CalculatedInstallment};
use crate::serialization::ScheduleView;
use crate::store::{SaleSnapshot, SaleStore, StoreError};
use crate::types::{RedistributionPolicy, SaleId};

/// result of an arrears sweep with notification dispatch
#[derive(Debug, Default)]
pub struct ArrearsSweep {
    pub clients: Vec<ClientOverdueInfo>,
    pub notified: u32,
    pub failed: u32,
}

/// orchestrator tying the pure calculators to the store and notifier
/// boundaries. The read operations recompute from scratch on every call; only
/// `redistribute` writes, through the store's compare-and-swap commit.
pub struct InstallmentEngine<S: SaleStore> {
    store: S,
    pub events: EventStore,
}

impl<S: SaleStore> InstallmentEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            events: EventStore::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// full calculated schedule for one sale
    pub fn schedule_for_sale(
        &self,
        sale_id: SaleId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<CalculatedInstallment>> {
        let snapshot = self.fetch_snapshot(sale_id)?;
        let today = time_provider.now().date_naive();
        Ok(schedule_for_sale(
            &snapshot.sale,
            &snapshot.allocations,
            today,
        ))
    }

    /// schedule shaped for the api layer
    pub fn schedule_view(
        &self,
        sale_id: SaleId,
        time_provider: &SafeTimeProvider,
    ) -> Result<ScheduleView> {
        let snapshot = self.fetch_snapshot(sale_id)?;
        let today = time_provider.now().date_naive();
        let schedule = schedule_for_sale(&snapshot.sale, &snapshot.allocations, today);
        Ok(ScheduleView::from_schedule(&snapshot.sale, &schedule))
    }

    /// the currently-overdue subset for one sale
    pub fn overdue_for_sale(
        &self,
        sale_id: SaleId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<CalculatedInstallment>> {
        let schedule = self.schedule_for_sale(sale_id, time_provider)?;
        Ok(overdue_installments(&schedule))
    }

    /// clients currently in arrears across all active sales, fetched in bulk
    pub fn clients_in_arrears(
        &self,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<ClientOverdueInfo>> {
        let snapshots = self
            .store
            .fetch_active_sales()
            .map_err(|err| read_error(None, err))?;
        let today = time_provider.now().date_naive();
        Ok(aggregate_client_arrears(&snapshots, today))
    }

    /// fold the sale's overdue balance into its remaining quotas: read,
    /// compute, compare-and-swap commit. A stale commit surfaces as a
    /// retryable conflict and leaves the sale untouched.
    pub fn redistribute(
        &mut self,
        sale_id: SaleId,
        policy: RedistributionPolicy,
        time_provider: &SafeTimeProvider,
    ) -> Result<RedistributionOutcome> {
        let snapshot = self.fetch_snapshot(sale_id)?;
        let today = time_provider.now().date_naive();
        let schedule = schedule_for_sale(&snapshot.sale, &snapshot.allocations, today);

        let outcome = plan_redistribution(&snapshot.sale, &schedule, policy)?;
        let absorbed = merge_absorbed(&snapshot.sale.absorbed_quotas, &outcome.absorbed_numbers);

        self.store
            .commit_redistribution(sale_id, snapshot.sale.version, &absorbed, &outcome.new_quotas)
            .map_err(|err| match err {
                StoreError::Conflict { expected, found } => {
                    ScheduleError::ConcurrentRedistributionConflict {
                        sale_id,
                        expected,
                        found,
                    }
                }
                StoreError::NotFound => ScheduleError::SaleNotFound { sale_id },
                StoreError::Unavailable(message) => ScheduleError::StoreUnavailable { message },
            })?;

        debug!(%sale_id, balance = %outcome.redistributed_balance, "redistribution committed");
        self.events.emit(Event::QuotasRedistributed {
            sale_id,
            policy,
            redistributed_balance: outcome.redistributed_balance,
            absorbed_numbers: outcome.absorbed_numbers.clone(),
            timestamp: time_provider.now(),
        });

        Ok(outcome)
    }

    /// run the arrears sweep and dispatch notifications. A notifier failure
    /// for one client is logged and counted; it never aborts the rest of the
    /// batch.
    pub fn notify_arrears(
        &mut self,
        notifier: &dyn ArrearsNotifier,
        time_provider: &SafeTimeProvider,
    ) -> Result<ArrearsSweep> {
        let clients = self.clients_in_arrears(time_provider)?;
        let mut sweep = ArrearsSweep {
            clients: Vec::new(),
            notified: 0,
            failed: 0,
        };

        for info in clients {
            let client_id = info.client.client_id;
            self.events.emit(Event::ClientInArrears {
                client_id,
                total_overdue: info.total_overdue,
                overdue_quota_count: info.overdue_quota_count,
                timestamp: time_provider.now(),
            });

            match notifier.notify(&info) {
                Ok(()) => {
                    sweep.notified += 1;
                    self.events.emit(Event::ArrearsNotified {
                        client_id,
                        timestamp: time_provider.now(),
                    });
                }
                Err(err) => {
                    warn!(%client_id, %err, "arrears notification failed");
                    sweep.failed += 1;
                    self.events.emit(Event::ArrearsNotificationFailed {
                        client_id,
                        reason: err.to_string(),
                        timestamp: time_provider.now(),
                    });
                }
            }

            sweep.clients.push(info);
        }

        Ok(sweep)
    }

    fn fetch_snapshot(&self, sale_id: SaleId) -> Result<SaleSnapshot> {
        self.store
            .fetch_sale(sale_id)
            .map_err(|err| read_error(Some(sale_id), err))?
            .ok_or(ScheduleError::SaleNotFound { sale_id })
    }
}

fn read_error(sale_id: Option<SaleId>, err: StoreError) -> ScheduleError {
    match (sale_id, err) {
        (Some(sale_id), StoreError::NotFound) => ScheduleError::SaleNotFound { sale_id },
        (_, StoreError::Unavailable(message)) => ScheduleError::StoreUnavailable { message },
        (_, other) => ScheduleError::StoreUnavailable {
            message: other.to_string(),
        },
    }
}
