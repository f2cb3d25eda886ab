pub mod commission;
pub mod equal_installment;
pub mod equal_principal;
pub mod loan;
pub mod summary;

pub use commission::CommissionMode;
pub use loan::{
    calculate_schedule, CostMetrics, InstallmentRow, LoanRequest, LoanScheme, Schedule,
    ScheduleTotals, UpfrontCharge, DEFAULT_BSMV_RATE,
};
