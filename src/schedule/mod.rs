pub mod calculator;
pub mod coverage;
pub mod plan;

use chrono::NaiveDate;

use crate::sale::Sale;

pub use calculator::{calculate_schedule, CalculatedInstallment};
pub use coverage::{aggregate_coverage, CoverageMap, PaymentAllocation};
pub use plan::{due_date_for, resolve_plan, try_resolve_plan, QuotaDescriptor};

/// resolve, aggregate, and calculate in one call
pub fn schedule_for_sale(
    sale: &Sale,
    allocations: &[PaymentAllocation],
    today: NaiveDate,
) -> Vec<CalculatedInstallment> {
    let descriptors = plan::resolve_plan(sale);
    let coverage = coverage::aggregate_coverage(allocations);
    calculator::calculate_schedule(&descriptors, &coverage, &sale.absorbed_quotas, today)
}
