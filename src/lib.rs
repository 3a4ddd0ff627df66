pub mod arrears;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod notify;
pub mod redistribution;
pub mod sale;
pub mod schedule;
pub mod serialization;
pub mod store;
pub mod types;

// re-export key types
pub use arrears::{aggregate_client_arrears, overdue_installments, ClientOverdueInfo, OverdueInstallment};
pub use decimal::{Money, Rate};
pub use engine::{ArrearsSweep, InstallmentEngine};
pub use errors::{Result, ScheduleError};
pub use events::{Event, EventStore};
pub use notify::{ArrearsNotifier, NotifyError};
pub use redistribution::{plan_redistribution, RedistributionOutcome};
pub use sale::{CustomQuota, FinancingPlan, Sale};
pub use schedule::{
    aggregate_coverage, calculate_schedule, resolve_plan, schedule_for_sale,
    CalculatedInstallment, CoverageMap, PaymentAllocation, QuotaDescriptor,
};
pub use serialization::{InstallmentView, ScheduleView};
pub use store::{InMemorySaleStore, SaleSnapshot, SaleStore, StoreError};
pub use types::{
    Client, ClientId, InstallmentStatus, PaymentId, RedistributionPolicy, SaleId, SaleStatus,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
