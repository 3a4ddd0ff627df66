use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::sale::{CustomQuota, FinancingPlan, Sale};
use crate::schedule::CalculatedInstallment;
use crate::types::{InstallmentStatus, RedistributionPolicy, SaleId};

/// computed schedule rewrite, ready for an atomic commit
#[derive(Debug, Clone, PartialEq)]
pub struct RedistributionOutcome {
    pub sale_id: SaleId,
    pub policy: RedistributionPolicy,
    /// total overdue balance folded into the remaining quotas
    pub redistributed_balance: Money,
    /// quota numbers absorbed by this operation
    pub absorbed_numbers: Vec<u32>,
    /// the full explicit quota list the sale's plan becomes
    pub new_quotas: Vec<CustomQuota>,
}

/// compute the rewrite for a sale's current overdue balance. Pure: reads the
/// calculated schedule, writes nothing; committing the outcome is the
/// caller's (store's) job.
///
/// Targets are quotas that are not absorbed, not paid, and not yet due
/// (`Pending` or `PartiallyPaid`). Every quota is re-emitted as an explicit
/// custom entry so the plan carries its own amounts from here on; explicit
/// custom due dates are preserved verbatim.
pub fn plan_redistribution(
    sale: &Sale,
    schedule: &[CalculatedInstallment],
    policy: RedistributionPolicy,
) -> Result<RedistributionOutcome> {
    let overdue: Vec<&CalculatedInstallment> = schedule
        .iter()
        .filter(|i| i.status == InstallmentStatus::Overdue && i.balance > Money::ZERO)
        .collect();
    if overdue.is_empty() {
        return Err(ScheduleError::NoOverdueQuotas {
            sale_id: sale.sale_id,
        });
    }

    let remaining: Vec<&CalculatedInstallment> = schedule
        .iter()
        .filter(|i| {
            matches!(
                i.status,
                InstallmentStatus::Pending | InstallmentStatus::PartiallyPaid
            )
        })
        .collect();
    if remaining.is_empty() {
        return Err(ScheduleError::NoRemainingQuotas {
            sale_id: sale.sale_id,
        });
    }

    let redistributed_balance = overdue
        .iter()
        .fold(Money::ZERO, |acc, i| acc + i.balance);

    let additions = match policy {
        RedistributionPolicy::Uniform => uniform_additions(redistributed_balance, &remaining),
        RedistributionPolicy::LastQuota => last_quota_addition(redistributed_balance, &remaining),
    };

    let explicit_dates = explicit_due_dates(sale);
    let new_quotas = schedule
        .iter()
        .map(|installment| CustomQuota {
            number: installment.number,
            amount: installment.expected
                + additions
                    .get(&installment.number)
                    .copied()
                    .unwrap_or(Money::ZERO),
            due_date: explicit_dates.get(&installment.number).copied(),
        })
        .collect();

    let absorbed_numbers = overdue.iter().map(|i| i.number).collect();

    Ok(RedistributionOutcome {
        sale_id: sale.sale_id,
        policy,
        redistributed_balance,
        absorbed_numbers,
        new_quotas,
    })
}

/// union of the sale's current absorbed list and freshly absorbed numbers,
/// sorted and deduplicated; absorbing a quota twice never duplicates it
pub fn merge_absorbed(existing: &[u32], fresh: &[u32]) -> Vec<u32> {
    let mut merged: Vec<u32> = existing.to_vec();
    merged.extend_from_slice(fresh);
    merged.sort_unstable();
    merged.dedup();
    merged
}

/// spread the balance evenly; the per-quota share is truncated to cents and
/// the remainder lands on the last remaining quota so the additions sum
/// exactly to the redistributed balance
fn uniform_additions(
    total: Money,
    remaining: &[&CalculatedInstallment],
) -> BTreeMap<u32, Money> {
    let count = Decimal::from(remaining.len());
    let share = Money::from_decimal(
        (total.as_decimal() / count).round_dp_with_strategy(2, RoundingStrategy::ToZero),
    );

    let mut additions = BTreeMap::new();
    let mut assigned = Money::ZERO;
    for installment in &remaining[..remaining.len() - 1] {
        additions.insert(installment.number, share);
        assigned += share;
    }
    let last = remaining[remaining.len() - 1];
    additions.insert(last.number, total - assigned);
    additions
}

fn last_quota_addition(
    total: Money,
    remaining: &[&CalculatedInstallment],
) -> BTreeMap<u32, Money> {
    let mut additions = BTreeMap::new();
    if let Some(last) = remaining.iter().max_by_key(|i| i.number) {
        additions.insert(last.number, total);
    }
    additions
}

fn explicit_due_dates(sale: &Sale) -> BTreeMap<u32, chrono::NaiveDate> {
    match &sale.plan {
        FinancingPlan::Custom { quotas, .. } => quotas
            .iter()
            .filter_map(|q| q.due_date.map(|d| (q.number, d)))
            .collect(),
        _ => BTreeMap::new(),
    }
}
