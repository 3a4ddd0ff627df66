use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a sale
pub type SaleId = Uuid;

/// unique identifier for a client
pub type ClientId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// sale lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    /// financing in progress, schedule enforced
    Active,
    /// buyer withdrew from the purchase
    Withdrawn,
    /// fully paid and closed
    Completed,
}

/// calculated installment status, listed in assignment priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// balance folded into other quotas by redistribution, excluded from
    /// overdue detection regardless of balance
    Absorbed,
    /// balance fully covered
    Paid,
    /// due date passed with a positive balance
    Overdue,
    /// partially covered, not yet due
    PartiallyPaid,
    /// untouched, not yet due
    Pending,
}

/// how an overdue balance is folded into the remaining schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedistributionPolicy {
    /// spread evenly across all remaining quotas
    Uniform,
    /// add the entire balance to the highest-numbered remaining quota
    LastQuota,
}

/// client identity as the notification boundary receives it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: ClientId,
    pub full_name: String,
    pub email: Option<String>,
}
