use crate::decimal::Money;
use crate::schedule::CalculatedInstallment;
use crate::types::InstallmentStatus;

/// the currently-overdue subset of a calculated schedule. Absorbed quotas are
/// excluded by construction; the calculator never marks them overdue.
pub fn overdue_installments(schedule: &[CalculatedInstallment]) -> Vec<CalculatedInstallment> {
    schedule
        .iter()
        .filter(|installment| {
            installment.status == InstallmentStatus::Overdue && installment.balance > Money::ZERO
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(number: u32, balance: i64, status: InstallmentStatus) -> CalculatedInstallment {
        CalculatedInstallment {
            number,
            expected: Money::from_major(1_000_000),
            paid: Money::from_major(1_000_000 - balance),
            balance: Money::from_major(balance),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            status,
            days_overdue: if status == InstallmentStatus::Overdue { 51 } else { 0 },
        }
    }

    #[test]
    fn test_only_overdue_with_positive_balance() {
        let schedule = vec![
            row(1, 600_000, InstallmentStatus::Overdue),
            row(2, 0, InstallmentStatus::Paid),
            row(3, 1_000_000, InstallmentStatus::Absorbed),
            row(4, 1_000_000, InstallmentStatus::Pending),
            row(5, 250_000, InstallmentStatus::PartiallyPaid),
        ];

        let overdue = overdue_installments(&schedule);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].number, 1);
    }

    #[test]
    fn test_empty_schedule_yields_nothing() {
        assert!(overdue_installments(&[]).is_empty());
    }
}
