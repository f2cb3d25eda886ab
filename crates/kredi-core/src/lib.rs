pub mod amortization;
pub mod calendar;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "report")]
pub mod report;

pub use error::KrediError;
pub use types::*;

/// Standard result type for all kredi operations
pub type KrediResult<T> = Result<T, KrediError>;
