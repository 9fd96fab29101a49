//! Capital ledger: the single source of truth for deployable cash.
//!
//! Each account's cash sits in one of three buckets: available, reserved,
//! deployed. Approval moves cash from available to reserved, a fill moves it
//! from reserved to deployed, and a close returns it to available with
//! realized P&L applied. The total across the three buckets changes only via
//! logged capital transactions (deposits, withdrawals, transfers, P&L).

pub mod error;
pub mod ledger;
pub mod types;

pub use error::LedgerError;
pub use ledger::Treasury;
pub use types::{
    CapitalTransaction, FundingPlan, FundingType, PortfolioSummary, SipFrequency, TransactionType,
};
