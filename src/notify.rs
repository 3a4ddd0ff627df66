use thiserror::Error;

use crate::arrears::ClientOverdueInfo;

/// outbound dispatch boundary; message formatting and delivery live behind it.
/// Repeat-notification throttling is the implementor's policy, not the
/// engine's.
pub trait ArrearsNotifier: Send + Sync {
    fn notify(&self, info: &ClientOverdueInfo) -> Result<(), NotifyError>;
}

/// notification dispatch error
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
