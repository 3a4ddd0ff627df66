use thiserror::Error;

use crate::types::SaleId;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("sale {sale_id} has no resolvable plan")]
    InvalidPlan {
        sale_id: SaleId,
    },

    #[error("malformed {field} data on sale {sale_id}: {message}")]
    MalformedScheduleData {
        sale_id: SaleId,
        field: &'static str,
        message: String,
    },

    #[error("no remaining quotas on sale {sale_id} to receive the redistributed balance")]
    NoRemainingQuotas {
        sale_id: SaleId,
    },

    #[error("nothing to redistribute on sale {sale_id}: no overdue quotas")]
    NoOverdueQuotas {
        sale_id: SaleId,
    },

    #[error("concurrent redistribution on sale {sale_id}: expected version {expected}, found {found}")]
    ConcurrentRedistributionConflict {
        sale_id: SaleId,
        expected: u64,
        found: u64,
    },

    #[error("sale not found: {sale_id}")]
    SaleNotFound {
        sale_id: SaleId,
    },

    #[error("store unavailable: {message}")]
    StoreUnavailable {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
