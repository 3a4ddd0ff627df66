use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::{ClientId, SaleId, SaleStatus};

/// one entry of a custom financing plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomQuota {
    /// 1-based quota number, unique within a sale
    pub number: u32,
    pub amount: Money,
    /// explicit due date; derived from the sale date when absent
    pub due_date: Option<NaiveDate>,
}

/// financing plan shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FinancingPlan {
    /// uniform quotas over the financed balance
    Automatic {
        quota_count: u32,
        quota_value: Money,
    },
    /// initial payment defined as a percentage of total value
    House {
        quota_count: u32,
        quota_value: Money,
        initial_percentage: Rate,
    },
    /// individually specified quotas
    Custom {
        quota_count: u32,
        quotas: Vec<CustomQuota>,
    },
}

impl FinancingPlan {
    /// build a custom plan from an explicit quota list
    pub fn custom(quotas: Vec<CustomQuota>) -> Self {
        let quota_count = quotas.iter().map(|q| q.number).max().unwrap_or(0);
        FinancingPlan::Custom { quota_count, quotas }
    }

    /// effective quota count: the declared count, stretched to the highest
    /// custom quota number when the list reaches further
    pub fn quota_count(&self) -> u32 {
        match self {
            FinancingPlan::Automatic { quota_count, .. } => *quota_count,
            FinancingPlan::House { quota_count, .. } => *quota_count,
            FinancingPlan::Custom { quota_count, quotas } => {
                let max_number = quotas.iter().map(|q| q.number).max().unwrap_or(0);
                (*quota_count).max(max_number)
            }
        }
    }

    /// uniform per-quota amount, where the plan has one
    pub fn quota_value(&self) -> Option<Money> {
        match self {
            FinancingPlan::Automatic { quota_value, .. } => Some(*quota_value),
            FinancingPlan::House { quota_value, .. } => Some(*quota_value),
            FinancingPlan::Custom { .. } => None,
        }
    }
}

/// a financed lot purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: SaleId,
    pub client_id: ClientId,

    // display labels carried into arrears reporting
    pub lot_label: String,
    pub project_label: String,

    // commercial terms
    pub total_value: Money,
    pub initial_payment: Money,
    pub plan: FinancingPlan,
    /// uniform override written by earlier redistribution tooling; takes
    /// precedence over the plan's quota value when resolving the schedule
    pub new_quota_value: Option<Money>,
    /// schedule anchor: quota i falls due i months after this date
    pub sale_date: NaiveDate,

    /// quota numbers already absorbed by redistribution, sorted
    pub absorbed_quotas: Vec<u32>,

    pub status: SaleStatus,

    // running totals; total_debt = total_value - total_raised is maintained by
    // every mutation of the raised amount, never recomputed from the schedule
    pub total_raised: Money,
    pub total_debt: Money,

    /// optimistic-concurrency version, bumped by every committed write
    pub version: u64,
}

impl Sale {
    /// automatic plan: uniform quotas, value derived from the financed balance
    /// when not given explicitly
    pub fn automatic(
        client_id: ClientId,
        lot_label: impl Into<String>,
        project_label: impl Into<String>,
        total_value: Money,
        initial_payment: Money,
        sale_date: NaiveDate,
        quota_count: u32,
        quota_value: Option<Money>,
    ) -> Self {
        let quota_value = quota_value
            .unwrap_or_else(|| derive_quota_value(total_value, initial_payment, quota_count));
        let plan = FinancingPlan::Automatic {
            quota_count,
            quota_value,
        };
        Self::with_plan(
            client_id,
            lot_label.into(),
            project_label.into(),
            total_value,
            initial_payment,
            sale_date,
            plan,
        )
    }

    /// house plan: the initial payment is a percentage of total value
    pub fn house(
        client_id: ClientId,
        lot_label: impl Into<String>,
        project_label: impl Into<String>,
        total_value: Money,
        initial_percentage: Rate,
        sale_date: NaiveDate,
        quota_count: u32,
    ) -> Self {
        let initial_payment = initial_percentage.of(total_value);
        let quota_value = derive_quota_value(total_value, initial_payment, quota_count);
        let plan = FinancingPlan::House {
            quota_count,
            quota_value,
            initial_percentage,
        };
        Self::with_plan(
            client_id,
            lot_label.into(),
            project_label.into(),
            total_value,
            initial_payment,
            sale_date,
            plan,
        )
    }

    /// custom plan: explicit per-quota amounts and optional dates
    pub fn custom(
        client_id: ClientId,
        lot_label: impl Into<String>,
        project_label: impl Into<String>,
        total_value: Money,
        initial_payment: Money,
        sale_date: NaiveDate,
        quotas: Vec<CustomQuota>,
    ) -> Self {
        Self::with_plan(
            client_id,
            lot_label.into(),
            project_label.into(),
            total_value,
            initial_payment,
            sale_date,
            FinancingPlan::custom(quotas),
        )
    }

    fn with_plan(
        client_id: ClientId,
        lot_label: String,
        project_label: String,
        total_value: Money,
        initial_payment: Money,
        sale_date: NaiveDate,
        plan: FinancingPlan,
    ) -> Self {
        Self {
            sale_id: Uuid::new_v4(),
            client_id,
            lot_label,
            project_label,
            total_value,
            initial_payment,
            plan,
            new_quota_value: None,
            sale_date,
            absorbed_quotas: Vec::new(),
            status: SaleStatus::Active,
            total_raised: initial_payment,
            total_debt: total_value - initial_payment,
            version: 0,
        }
    }

    /// uniform quota amount used when the plan has no per-quota entry
    pub fn effective_quota_value(&self) -> Money {
        self.new_quota_value
            .or_else(|| self.plan.quota_value())
            .unwrap_or(Money::ZERO)
    }

    pub fn is_active(&self) -> bool {
        self.status == SaleStatus::Active
    }

    /// register raised funds, maintaining the debt invariant
    pub fn record_raised(&mut self, amount: Money) {
        self.total_raised += amount;
        self.total_debt = self.total_value - self.total_raised;
    }

    /// back out raised funds (payment amended or reversed)
    pub fn reverse_raised(&mut self, amount: Money) {
        self.total_raised -= amount;
        self.total_debt = self.total_value - self.total_raised;
    }

    pub fn update_status(&mut self, new_status: SaleStatus) {
        self.status = new_status;
    }
}

fn derive_quota_value(total_value: Money, initial_payment: Money, quota_count: u32) -> Money {
    if quota_count == 0 {
        return Money::ZERO;
    }
    (total_value - initial_payment) / Decimal::from(quota_count)
}
