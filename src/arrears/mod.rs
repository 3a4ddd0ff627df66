pub mod aggregator;
pub mod detector;

pub use aggregator::{aggregate_client_arrears, ClientOverdueInfo, OverdueInstallment};
pub use detector::overdue_installments;
