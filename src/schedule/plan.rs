use chrono::{Datelike, NaiveDate};

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::sale::{FinancingPlan, Sale};

/// normalized quota definition: what is owed and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaDescriptor {
    pub number: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// resolve a sale's plan configuration into ordered quota descriptors,
/// degrading to an empty schedule when the plan is unresolvable
pub fn resolve_plan(sale: &Sale) -> Vec<QuotaDescriptor> {
    try_resolve_plan(sale).unwrap_or_default()
}

/// strict variant for callers that need to distinguish an unresolvable plan
pub fn try_resolve_plan(sale: &Sale) -> Result<Vec<QuotaDescriptor>> {
    let count = sale.plan.quota_count();
    if count == 0 {
        return Err(ScheduleError::InvalidPlan {
            sale_id: sale.sale_id,
        });
    }

    let descriptors = match &sale.plan {
        FinancingPlan::Custom { quotas, .. } if !quotas.is_empty() => (1..=count)
            .map(|number| {
                let entry = quotas.iter().find(|q| q.number == number);
                let amount = entry
                    .map(|q| q.amount)
                    .unwrap_or_else(|| sale.effective_quota_value());
                let due_date = entry
                    .and_then(|q| q.due_date)
                    .unwrap_or_else(|| due_date_for(sale.sale_date, number));
                QuotaDescriptor {
                    number,
                    amount,
                    due_date,
                }
            })
            .collect(),
        _ => {
            let amount = sale.effective_quota_value();
            (1..=count)
                .map(|number| QuotaDescriptor {
                    number,
                    amount,
                    due_date: due_date_for(sale.sale_date, number),
                })
                .collect()
        }
    };

    Ok(descriptors)
}

/// due date for quota `i`: the sale date advanced `i` calendar months, with the
/// day-of-month clamped to the last valid day of the target month
pub fn due_date_for(anchor: NaiveDate, quota_number: u32) -> NaiveDate {
    add_months_clamped(anchor, quota_number)
}

fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    let day = date.day().min(days_in_month(year, month));

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(due) => due,
        // unreachable: day is clamped to the month's length
        None => date,
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::CustomQuota;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn automatic_sale(sale_date: NaiveDate, quota_count: u32) -> Sale {
        Sale::automatic(
            Uuid::new_v4(),
            "Lote 1",
            "Altos del Norte",
            Money::from_major(3_000_000) + Money::from_major(1_000_000) * rust_decimal::Decimal::from(quota_count),
            Money::from_major(3_000_000),
            sale_date,
            quota_count,
            None,
        )
    }

    #[test]
    fn test_month_end_clamping() {
        // jan 31 lands on the last day of short months, never overflows
        assert_eq!(due_date_for(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(due_date_for(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(due_date_for(date(2024, 1, 31), 2), date(2024, 3, 31));
        assert_eq!(due_date_for(date(2024, 1, 31), 3), date(2024, 4, 30));
        assert_eq!(due_date_for(date(2024, 3, 31), 1), date(2024, 4, 30));
    }

    #[test]
    fn test_year_rollover() {
        assert_eq!(due_date_for(date(2024, 11, 15), 3), date(2025, 2, 15));
        assert_eq!(due_date_for(date(2024, 1, 31), 13), date(2025, 2, 28));
        assert_eq!(due_date_for(date(2024, 6, 30), 24), date(2026, 6, 30));
    }

    #[test]
    fn test_automatic_plan_resolves_uniform_schedule() {
        let sale = automatic_sale(date(2024, 1, 15), 12);
        let descriptors = resolve_plan(&sale);

        assert_eq!(descriptors.len(), 12);
        assert_eq!(descriptors[0].number, 1);
        assert_eq!(descriptors[0].due_date, date(2024, 2, 15));
        assert_eq!(descriptors[11].due_date, date(2025, 1, 15));
        for d in &descriptors {
            assert_eq!(d.amount, Money::from_major(1_000_000));
        }
    }

    #[test]
    fn test_custom_plan_explicit_dates_used_verbatim() {
        let quotas = vec![
            CustomQuota {
                number: 1,
                amount: Money::from_major(2_000_000),
                due_date: Some(date(2024, 6, 1)),
            },
            CustomQuota {
                number: 2,
                amount: Money::from_major(500_000),
                due_date: None,
            },
        ];
        let sale = Sale::custom(
            Uuid::new_v4(),
            "Lote 4",
            "Villa Sol",
            Money::from_major(5_000_000),
            Money::from_major(2_500_000),
            date(2024, 1, 31),
            quotas,
        );

        let descriptors = resolve_plan(&sale);
        assert_eq!(descriptors[0].due_date, date(2024, 6, 1));
        assert_eq!(descriptors[0].amount, Money::from_major(2_000_000));
        // entry without an explicit date falls back to the calendar rule
        assert_eq!(descriptors[1].due_date, date(2024, 3, 31));
    }

    #[test]
    fn test_custom_plan_gap_falls_back_to_effective_value() {
        let quotas = vec![CustomQuota {
            number: 3,
            amount: Money::from_major(900_000),
            due_date: None,
        }];
        let mut sale = Sale::custom(
            Uuid::new_v4(),
            "Lote 7",
            "Villa Sol",
            Money::from_major(4_000_000),
            Money::ZERO,
            date(2024, 2, 10),
            quotas,
        );
        sale.new_quota_value = Some(Money::from_major(750_000));

        let descriptors = resolve_plan(&sale);
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].amount, Money::from_major(750_000));
        assert_eq!(descriptors[2].amount, Money::from_major(900_000));
    }

    #[test]
    fn test_unresolvable_plan_degrades_to_empty() {
        let sale = Sale::custom(
            Uuid::new_v4(),
            "Lote 8",
            "Villa Sol",
            Money::from_major(4_000_000),
            Money::ZERO,
            date(2024, 2, 10),
            Vec::new(),
        );

        assert!(matches!(
            try_resolve_plan(&sale),
            Err(ScheduleError::InvalidPlan { .. })
        ));
        assert!(resolve_plan(&sale).is_empty());
    }
}
