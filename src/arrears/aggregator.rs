use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::schedule::schedule_for_sale;
use crate::store::SaleSnapshot;
use crate::types::{Client, ClientId};
use crate::types::SaleId;

use super::detector::overdue_installments;

/// one overdue installment annotated with its origin for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueInstallment {
    pub sale_id: SaleId,
    pub lot_label: String,
    pub project_label: String,
    pub quota_number: u32,
    pub balance: Money,
    pub due_date: NaiveDate,
    pub days_overdue: u32,
}

/// a client plus everything overdue across their active sales; built
/// transiently for reporting and notification, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOverdueInfo {
    pub client: Client,
    pub total_overdue: Money,
    pub overdue_quota_count: u32,
    pub installments: Vec<OverdueInstallment>,
}

/// fold per-sale overdue installments into per-client summaries. Only sales
/// with status `Active` and `total_debt > 0` participate; clients with nothing
/// overdue are omitted rather than returned with zero totals.
pub fn aggregate_client_arrears(
    snapshots: &[SaleSnapshot],
    today: NaiveDate,
) -> Vec<ClientOverdueInfo> {
    let mut by_client: BTreeMap<ClientId, ClientOverdueInfo> = BTreeMap::new();

    for snapshot in snapshots {
        if !snapshot.sale.is_active() || snapshot.sale.total_debt <= Money::ZERO {
            continue;
        }

        let schedule = schedule_for_sale(&snapshot.sale, &snapshot.allocations, today);
        let overdue = overdue_installments(&schedule);
        if overdue.is_empty() {
            continue;
        }

        let entry = by_client
            .entry(snapshot.client.client_id)
            .or_insert_with(|| ClientOverdueInfo {
                client: snapshot.client.clone(),
                total_overdue: Money::ZERO,
                overdue_quota_count: 0,
                installments: Vec::new(),
            });

        for installment in overdue {
            entry.total_overdue += installment.balance;
            entry.overdue_quota_count += 1;
            entry.installments.push(OverdueInstallment {
                sale_id: snapshot.sale.sale_id,
                lot_label: snapshot.sale.lot_label.clone(),
                project_label: snapshot.sale.project_label.clone(),
                quota_number: installment.number,
                balance: installment.balance,
                due_date: installment.due_date,
                days_overdue: installment.days_overdue,
            });
        }
    }

    by_client.into_values().collect()
}
