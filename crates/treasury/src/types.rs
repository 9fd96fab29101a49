//! Funding plans, capital transactions, and portfolio aggregates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trade_desk_core::AccountId;

/// How an account is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingType {
    Sip,
    LumpSum,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SipFrequency {
    Weekly,
    Monthly,
}

/// Per-account cash state. One plan per account; mutated only through
/// [`crate::Treasury`] operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingPlan {
    pub account_id: AccountId,
    pub funding_type: FundingType,
    pub sip_amount: Option<Decimal>,
    pub sip_frequency: Option<SipFrequency>,
    pub lump_sum_amount: Option<Decimal>,
    /// Portion of available cash held back from deployment, in percent.
    pub emergency_buffer_percent: Decimal,
    pub available_cash: Decimal,
    pub reserved_cash: Decimal,
    pub total_deployed: Decimal,
}

impl FundingPlan {
    /// A SIP-funded plan starting with zero balance; installments arrive
    /// via `Treasury::deposit_installment`.
    #[must_use]
    pub fn sip(account_id: AccountId, amount: Decimal, frequency: SipFrequency) -> Self {
        Self {
            account_id,
            funding_type: FundingType::Sip,
            sip_amount: Some(amount),
            sip_frequency: Some(frequency),
            lump_sum_amount: None,
            emergency_buffer_percent: Decimal::from(5),
            available_cash: Decimal::ZERO,
            reserved_cash: Decimal::ZERO,
            total_deployed: Decimal::ZERO,
        }
    }

    /// A lump-sum plan with an initial tranche already available.
    #[must_use]
    pub fn lump_sum(account_id: AccountId, total: Decimal, initial_available: Decimal) -> Self {
        Self {
            account_id,
            funding_type: FundingType::LumpSum,
            sip_amount: None,
            sip_frequency: None,
            lump_sum_amount: Some(total),
            emergency_buffer_percent: Decimal::from(5),
            available_cash: initial_available,
            reserved_cash: Decimal::ZERO,
            total_deployed: Decimal::ZERO,
        }
    }

    /// available + reserved + deployed. Conserved across reserve/deploy/return.
    #[must_use]
    pub fn total_equity(&self) -> Decimal {
        self.available_cash + self.reserved_cash + self.total_deployed
    }

    /// available + deployed: the capital base used for risk-percent math.
    #[must_use]
    pub fn total_capital(&self) -> Decimal {
        self.available_cash + self.total_deployed
    }
}

/// Kind of explicit capital movement recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    RealizedPnl,
    TransferIn,
    TransferOut,
}

/// Immutable, write-once audit row for a ledger mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalTransaction {
    pub id: u64,
    pub account_id: AccountId,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    /// The other account for transfers.
    pub counterparty: Option<AccountId>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Capital aggregated across all accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_capital: Decimal,
    pub total_available: Decimal,
    pub total_reserved: Decimal,
    pub total_deployed: Decimal,
    /// deployed / (deployed + available + reserved), in percent.
    pub utilization_percent: Decimal,
    pub accounts_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn equity_and_capital_definitions_differ_by_reserved() {
        let plan = FundingPlan {
            available_cash: dec!(1000),
            reserved_cash: dec!(200),
            total_deployed: dec!(300),
            ..FundingPlan::lump_sum(1, dec!(1500), dec!(1000))
        };

        assert_eq!(plan.total_equity(), dec!(1500));
        assert_eq!(plan.total_capital(), dec!(1300));
    }
}
