//! Typed errors for ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;
use trade_desk_core::AccountId;

/// Errors raised by capital-ledger mutations.
///
/// Insufficient funds on `reserve` is NOT an error; it is an expected
/// business outcome and reported as `Ok(false)`. These variants cover
/// integrity violations and misuse; on any of them the ledger state is
/// left untouched.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No funding plan exists for the account.
    #[error("no funding plan for account {0}")]
    UnknownAccount(AccountId),

    /// Source account cannot cover an explicit outflow (withdrawal, transfer).
    #[error("insufficient funds in account {account_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        account_id: AccountId,
        requested: Decimal,
        available: Decimal,
    },

    /// The operation would drive a balance negative. Never silently clamped.
    #[error("{bucket} balance of account {account_id} would go negative: balance {balance}, change {change}")]
    WouldGoNegative {
        account_id: AccountId,
        bucket: &'static str,
        balance: Decimal,
        change: Decimal,
    },

    /// Amounts must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Transfers require two distinct accounts.
    #[error("cannot transfer within account {0}")]
    SelfTransfer(AccountId),
}

impl LedgerError {
    pub fn insufficient_funds(
        account_id: AccountId,
        requested: Decimal,
        available: Decimal,
    ) -> Self {
        Self::InsufficientFunds {
            account_id,
            requested,
            available,
        }
    }

    pub fn would_go_negative(
        account_id: AccountId,
        bucket: &'static str,
        balance: Decimal,
        change: Decimal,
    ) -> Self {
        Self::WouldGoNegative {
            account_id,
            bucket,
            balance,
            change,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn display_includes_balances() {
        let err = LedgerError::insufficient_funds(3, dec!(500), dec!(100));
        let text = err.to_string();
        assert!(text.contains("account 3"));
        assert!(text.contains("500"));
        assert!(text.contains("100"));
    }

    #[test]
    fn would_go_negative_names_the_bucket() {
        let err = LedgerError::would_go_negative(1, "reserved", dec!(10), dec!(-20));
        assert!(err.to_string().contains("reserved"));
    }
}
