use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{PaymentId, SaleId};

/// portion of a single payment applied against one quota of one sale; owned by
/// the payment that created it, read-only from the sale's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub payment_id: PaymentId,
    pub sale_id: SaleId,
    pub quota_number: u32,
    pub amount: Money,
    pub paid_on: NaiveDate,
}

/// per-quota covered totals; quota numbers without allocations are absent
pub type CoverageMap = BTreeMap<u32, Money>;

/// sum all allocation amounts per quota number; pure aggregation, no business
/// rules
pub fn aggregate_coverage(allocations: &[PaymentAllocation]) -> CoverageMap {
    let mut coverage = CoverageMap::new();
    for allocation in allocations {
        *coverage.entry(allocation.quota_number).or_insert(Money::ZERO) += allocation.amount;
    }
    coverage
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn allocation(sale_id: SaleId, quota_number: u32, amount: i64) -> PaymentAllocation {
        PaymentAllocation {
            payment_id: Uuid::new_v4(),
            sale_id,
            quota_number,
            amount: Money::from_major(amount),
            paid_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_successive_partials_accumulate() {
        let sale_id = Uuid::new_v4();
        let rows = vec![
            allocation(sale_id, 1, 400_000),
            allocation(sale_id, 1, 350_000),
            allocation(sale_id, 2, 1_000_000),
        ];

        let coverage = aggregate_coverage(&rows);
        assert_eq!(coverage.get(&1), Some(&Money::from_major(750_000)));
        assert_eq!(coverage.get(&2), Some(&Money::from_major(1_000_000)));
        assert_eq!(coverage.get(&3), None);
    }

    #[test]
    fn test_one_payment_spanning_quotas() {
        let sale_id = Uuid::new_v4();
        let payment_id = Uuid::new_v4();
        let paid_on = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let rows: Vec<PaymentAllocation> = (1..=3)
            .map(|quota_number| PaymentAllocation {
                payment_id,
                sale_id,
                quota_number,
                amount: Money::from_major(500_000),
                paid_on,
            })
            .collect();

        let coverage = aggregate_coverage(&rows);
        assert_eq!(coverage.len(), 3);
        for quota in 1..=3 {
            assert_eq!(coverage.get(&quota), Some(&Money::from_major(500_000)));
        }
    }

    #[test]
    fn test_empty_ledger() {
        assert!(aggregate_coverage(&[]).is_empty());
    }
}
