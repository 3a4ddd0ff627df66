use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::InstallmentStatus;

use super::coverage::CoverageMap;
use super::plan::QuotaDescriptor;

/// fully derived installment row; recomputed on every request, never cached.
/// Stale the moment a new allocation or redistribution lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedInstallment {
    pub number: u32,
    pub expected: Money,
    pub paid: Money,
    /// remaining balance, floored at zero
    pub balance: Money,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub days_overdue: u32,
}

/// derive the full installment list from the resolved plan, the coverage map,
/// the absorbed-quota list and the injected today. Pure; the single source of
/// truth for installment status.
pub fn calculate_schedule(
    descriptors: &[QuotaDescriptor],
    coverage: &CoverageMap,
    absorbed: &[u32],
    today: NaiveDate,
) -> Vec<CalculatedInstallment> {
    descriptors
        .iter()
        .map(|descriptor| calculate_installment(descriptor, coverage, absorbed, today))
        .collect()
}

fn calculate_installment(
    descriptor: &QuotaDescriptor,
    coverage: &CoverageMap,
    absorbed: &[u32],
    today: NaiveDate,
) -> CalculatedInstallment {
    let paid = coverage
        .get(&descriptor.number)
        .copied()
        .unwrap_or(Money::ZERO);
    let balance = (descriptor.amount - paid).max(Money::ZERO);

    let status = if absorbed.contains(&descriptor.number) {
        InstallmentStatus::Absorbed
    } else if balance.is_zero() {
        InstallmentStatus::Paid
    } else if descriptor.due_date < today {
        InstallmentStatus::Overdue
    } else if paid > Money::ZERO {
        InstallmentStatus::PartiallyPaid
    } else {
        InstallmentStatus::Pending
    };

    let days_overdue = if status == InstallmentStatus::Overdue {
        (today - descriptor.due_date).num_days().max(0) as u32
    } else {
        0
    };

    CalculatedInstallment {
        number: descriptor.number,
        expected: descriptor.amount,
        paid,
        balance,
        due_date: descriptor.due_date,
        status,
        days_overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::sale::Sale;
    use crate::schedule::{aggregate_coverage, resolve_plan, PaymentAllocation};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn descriptor(number: u32, amount: i64, due: NaiveDate) -> QuotaDescriptor {
        QuotaDescriptor {
            number,
            amount: Money::from_major(amount),
            due_date: due,
        }
    }

    fn coverage_of(entries: &[(u32, i64)]) -> CoverageMap {
        entries
            .iter()
            .map(|(n, a)| (*n, Money::from_major(*a)))
            .collect()
    }

    /// sale dated 2024-01-31, automatic, 3 quotas of 1,000,000, no payments,
    /// today 2024-04-20
    fn leap_year_sale() -> Sale {
        Sale::automatic(
            Uuid::new_v4(),
            "Lote 12",
            "Altos del Norte",
            Money::from_major(3_000_000),
            Money::ZERO,
            date(2024, 1, 31),
            3,
            None,
        )
    }

    #[test]
    fn test_unpaid_overdue_scenario() {
        let sale = leap_year_sale();
        let descriptors = resolve_plan(&sale);
        let schedule = calculate_schedule(&descriptors, &CoverageMap::new(), &[], date(2024, 4, 20));

        assert_eq!(schedule[0].due_date, date(2024, 2, 29));
        assert_eq!(schedule[0].status, InstallmentStatus::Overdue);
        assert_eq!(schedule[0].days_overdue, 51);

        assert_eq!(schedule[1].due_date, date(2024, 3, 31));
        assert_eq!(schedule[1].status, InstallmentStatus::Overdue);
        assert_eq!(schedule[1].days_overdue, 20);

        assert_eq!(schedule[2].due_date, date(2024, 4, 30));
        assert_eq!(schedule[2].status, InstallmentStatus::Pending);
        assert_eq!(schedule[2].days_overdue, 0);
    }

    #[test]
    fn test_partial_payment_on_overdue_quota_stays_overdue() {
        let sale = leap_year_sale();
        let descriptors = resolve_plan(&sale);
        let allocations = vec![PaymentAllocation {
            payment_id: Uuid::new_v4(),
            sale_id: sale.sale_id,
            quota_number: 1,
            amount: Money::from_major(400_000),
            paid_on: date(2024, 3, 5),
        }];
        let coverage = aggregate_coverage(&allocations);

        let schedule = calculate_schedule(&descriptors, &coverage, &[], date(2024, 4, 20));
        assert_eq!(schedule[0].balance, Money::from_major(600_000));
        assert_eq!(schedule[0].status, InstallmentStatus::Overdue);
    }

    #[test]
    fn test_absorbed_wins_over_every_other_status() {
        // positive balance, past due date: absorption still wins
        let descriptors = vec![descriptor(1, 1_000_000, date(2024, 2, 29))];
        let schedule =
            calculate_schedule(&descriptors, &CoverageMap::new(), &[1], date(2024, 4, 20));

        assert_eq!(schedule[0].status, InstallmentStatus::Absorbed);
        assert_eq!(schedule[0].days_overdue, 0);
        assert_eq!(schedule[0].balance, Money::from_major(1_000_000));
    }

    #[test]
    fn test_balance_floors_at_zero_on_overpayment() {
        let descriptors = vec![descriptor(1, 1_000_000, date(2024, 5, 31))];
        let coverage = coverage_of(&[(1, 1_300_000)]);

        let schedule = calculate_schedule(&descriptors, &coverage, &[], date(2024, 4, 20));
        assert_eq!(schedule[0].balance, Money::ZERO);
        assert_eq!(schedule[0].status, InstallmentStatus::Paid);
    }

    #[test]
    fn test_partially_paid_before_due_date() {
        let descriptors = vec![descriptor(1, 1_000_000, date(2024, 5, 31))];
        let coverage = coverage_of(&[(1, 250_000)]);

        let schedule = calculate_schedule(&descriptors, &coverage, &[], date(2024, 4, 20));
        assert_eq!(schedule[0].status, InstallmentStatus::PartiallyPaid);
        assert_eq!(schedule[0].balance, Money::from_major(750_000));
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = date(2024, 4, 30);
        let descriptors = vec![descriptor(1, 1_000_000, today)];

        let schedule = calculate_schedule(&descriptors, &CoverageMap::new(), &[], today);
        assert_eq!(schedule[0].status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_paid_wins_over_overdue_for_covered_quota() {
        let descriptors = vec![descriptor(1, 1_000_000, date(2024, 2, 29))];
        let coverage = coverage_of(&[(1, 1_000_000)]);

        let schedule = calculate_schedule(&descriptors, &coverage, &[], date(2024, 4, 20));
        assert_eq!(schedule[0].status, InstallmentStatus::Paid);
        assert_eq!(schedule[0].days_overdue, 0);
    }
}
