//! The treasury: per-account capital choreography.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use trade_desk_core::{AccountId, Scope};

use crate::error::{LedgerError, Result};
use crate::types::{
    CapitalTransaction, FundingPlan, FundingType, PortfolioSummary, TransactionType,
};

/// Fraction of the lump sum released per tranche.
const TRANCHE_FRACTION: Decimal = Decimal::from_parts(33, 0, 0, false, 2); // 0.33
/// Utilization above which the next tranche becomes eligible.
const TRANCHE_UTILIZATION_FLOOR: Decimal = Decimal::from_parts(8, 0, 0, false, 1); // 0.8
/// Available-cash fraction of the lump sum below which a tranche is released.
const TRANCHE_LOW_CASH_FRACTION: Decimal = Decimal::from_parts(1, 0, 0, false, 1); // 0.1

/// Single source of truth for deployable cash across accounts.
///
/// Every mutation of one account's plan runs under that account's lock
/// (single-writer discipline); `transfer` takes both locks in ascending
/// account-id order so concurrent transfers cannot deadlock.
pub struct Treasury {
    plans: RwLock<HashMap<AccountId, Arc<Mutex<FundingPlan>>>>,
    transactions: Mutex<Vec<CapitalTransaction>>,
    next_transaction_id: AtomicU64,
}

impl Default for Treasury {
    fn default() -> Self {
        Self::new()
    }
}

impl Treasury {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
            transactions: Mutex::new(Vec::new()),
            next_transaction_id: AtomicU64::new(1),
        }
    }

    /// Registers an account's funding plan. An initial available balance is
    /// logged as a deposit.
    pub async fn open_account(&self, plan: FundingPlan) {
        let account_id = plan.account_id;
        let initial = plan.available_cash;

        self.plans
            .write()
            .await
            .insert(account_id, Arc::new(Mutex::new(plan)));

        if initial > Decimal::ZERO {
            self.record(
                account_id,
                TransactionType::Deposit,
                initial,
                None,
                "Initial funding",
            )
            .await;
        }
        tracing::info!(account_id, available = %initial, "Opened funding plan");
    }

    async fn plan_handle(&self, account_id: AccountId) -> Result<Arc<Mutex<FundingPlan>>> {
        self.plans
            .read()
            .await
            .get(&account_id)
            .cloned()
            .ok_or(LedgerError::UnknownAccount(account_id))
    }

    /// Snapshot of an account's plan, if one exists.
    pub async fn funding_plan(&self, account_id: AccountId) -> Option<FundingPlan> {
        let handle = self.plans.read().await.get(&account_id).cloned()?;
        let plan = handle.lock().await;
        Some(plan.clone())
    }

    /// Reserves cash for a pending order. Returns `Ok(false)`, with state
    /// untouched, when available cash cannot cover the amount; shortfall is
    /// an expected business outcome, not an error.
    pub async fn reserve(&self, account_id: AccountId, amount: Decimal) -> Result<bool> {
        ensure_positive(amount)?;
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if plan.available_cash < amount {
            return Ok(false);
        }
        plan.available_cash -= amount;
        plan.reserved_cash += amount;

        tracing::info!(account_id, amount = %amount, "Reserved cash");
        Ok(true)
    }

    /// Returns reserved cash to available (order cancelled or rejected).
    pub async fn release(&self, account_id: AccountId, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if plan.reserved_cash < amount {
            return Err(LedgerError::would_go_negative(
                account_id,
                "reserved",
                plan.reserved_cash,
                -amount,
            ));
        }
        plan.reserved_cash -= amount;
        plan.available_cash += amount;

        tracing::info!(account_id, amount = %amount, "Released reservation");
        Ok(())
    }

    /// Moves reserved cash to deployed (order filled).
    pub async fn deploy(&self, account_id: AccountId, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if plan.reserved_cash < amount {
            return Err(LedgerError::would_go_negative(
                account_id,
                "reserved",
                plan.reserved_cash,
                -amount,
            ));
        }
        plan.reserved_cash -= amount;
        plan.total_deployed += amount;

        tracing::info!(account_id, amount = %amount, "Deployed cash");
        Ok(())
    }

    /// Returns deployed cash to available on position close, applying
    /// realized P&L (which may be negative). Nonzero P&L is logged as an
    /// explicit capital transaction.
    pub async fn return_capital(
        &self,
        account_id: AccountId,
        amount: Decimal,
        realized_pnl: Decimal,
    ) -> Result<()> {
        ensure_positive(amount)?;
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if plan.total_deployed < amount {
            return Err(LedgerError::would_go_negative(
                account_id,
                "deployed",
                plan.total_deployed,
                -amount,
            ));
        }
        let credit = amount + realized_pnl;
        if plan.available_cash + credit < Decimal::ZERO {
            return Err(LedgerError::would_go_negative(
                account_id,
                "available",
                plan.available_cash,
                credit,
            ));
        }
        plan.total_deployed -= amount;
        plan.available_cash += credit;
        drop(plan);

        if realized_pnl != Decimal::ZERO {
            self.record(
                account_id,
                TransactionType::RealizedPnl,
                realized_pnl,
                None,
                "Position close",
            )
            .await;
        }
        tracing::info!(account_id, amount = %amount, realized_pnl = %realized_pnl, "Returned capital");
        Ok(())
    }

    /// Credits the scheduled SIP installment, if the plan is SIP-funded.
    /// Returns the deposited amount, or `None` for non-SIP plans.
    pub async fn deposit_installment(&self, account_id: AccountId) -> Result<Option<Decimal>> {
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if !matches!(plan.funding_type, FundingType::Sip | FundingType::Hybrid) {
            return Ok(None);
        }
        let Some(amount) = plan.sip_amount.filter(|a| *a > Decimal::ZERO) else {
            return Ok(None);
        };
        plan.available_cash += amount;
        let frequency = plan.sip_frequency;
        drop(plan);

        self.record(
            account_id,
            TransactionType::Deposit,
            amount,
            None,
            format!("SIP installment - {frequency:?}"),
        )
        .await;

        tracing::info!(account_id, amount = %amount, "Processed SIP installment");
        Ok(Some(amount))
    }

    /// Releases the next tranche of a lump-sum plan: a 33% slice, once the
    /// account is over 80% utilized and available cash has fallen below 10%
    /// of the lump sum. Never releases beyond the committed lump sum.
    pub async fn release_next_tranche(&self, account_id: AccountId) -> Result<Option<Decimal>> {
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if !matches!(plan.funding_type, FundingType::LumpSum | FundingType::Hybrid) {
            return Ok(None);
        }
        let Some(lump_sum) = plan.lump_sum_amount.filter(|l| *l > Decimal::ZERO) else {
            return Ok(None);
        };

        let utilization = plan.total_deployed / lump_sum;
        let low_cash = plan.available_cash < lump_sum * TRANCHE_LOW_CASH_FRACTION;
        if utilization <= TRANCHE_UTILIZATION_FLOOR || !low_cash {
            return Ok(None);
        }

        let tranche = lump_sum * TRANCHE_FRACTION;
        if plan.available_cash + tranche > lump_sum {
            return Ok(None);
        }
        plan.available_cash += tranche;
        drop(plan);

        self.record(
            account_id,
            TransactionType::Deposit,
            tranche,
            None,
            "Tranche release - staged deployment",
        )
        .await;

        tracing::info!(account_id, amount = %tranche, "Released tranche");
        Ok(Some(tranche))
    }

    /// Withdraws from available cash. Rejected outright if it would drive
    /// the balance negative.
    pub async fn withdraw(&self, account_id: AccountId, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        let handle = self.plan_handle(account_id).await?;
        let mut plan = handle.lock().await;

        if plan.available_cash < amount {
            return Err(LedgerError::insufficient_funds(
                account_id,
                amount,
                plan.available_cash,
            ));
        }
        plan.available_cash -= amount;
        drop(plan);

        self.record(
            account_id,
            TransactionType::Withdrawal,
            amount,
            None,
            "Withdrawal",
        )
        .await;

        tracing::info!(account_id, amount = %amount, "Withdrew cash");
        Ok(())
    }

    /// Available cash net of the emergency buffer, floored at zero.
    pub async fn deployable_cash(&self, account_id: AccountId) -> Result<Decimal> {
        let handle = self.plan_handle(account_id).await?;
        let plan = handle.lock().await;

        let buffer = plan.available_cash * plan.emergency_buffer_percent / Decimal::from(100);
        Ok((plan.available_cash - buffer).max(Decimal::ZERO))
    }

    /// Atomically moves available cash between two accounts, writing paired
    /// TRANSFER_OUT / TRANSFER_IN audit rows. Both account locks are held for
    /// the duration, acquired in ascending account-id order.
    pub async fn transfer(
        &self,
        from_account: AccountId,
        to_account: AccountId,
        amount: Decimal,
        reason: &str,
    ) -> Result<()> {
        ensure_positive(amount)?;
        if from_account == to_account {
            return Err(LedgerError::SelfTransfer(from_account));
        }

        let from_handle = self.plan_handle(from_account).await?;
        let to_handle = self.plan_handle(to_account).await?;

        // Fixed global lock order prevents deadlock between opposing transfers.
        let (mut from_plan, mut to_plan) = if from_account < to_account {
            let first = from_handle.lock().await;
            let second = to_handle.lock().await;
            (first, second)
        } else {
            let second = to_handle.lock().await;
            let first = from_handle.lock().await;
            (first, second)
        };

        if from_plan.available_cash < amount {
            return Err(LedgerError::insufficient_funds(
                from_account,
                amount,
                from_plan.available_cash,
            ));
        }
        from_plan.available_cash -= amount;
        to_plan.available_cash += amount;

        self.record(
            from_account,
            TransactionType::TransferOut,
            amount,
            Some(to_account),
            reason,
        )
        .await;
        self.record(
            to_account,
            TransactionType::TransferIn,
            amount,
            Some(from_account),
            reason,
        )
        .await;

        tracing::info!(
            from_account,
            to_account,
            amount = %amount,
            "Transferred capital"
        );
        Ok(())
    }

    /// available + deployed for an account: the capital base for risk math.
    pub async fn total_capital(&self, account_id: AccountId) -> Option<Decimal> {
        self.funding_plan(account_id).await.map(|p| p.total_capital())
    }

    /// available + reserved + deployed for the scope. Unknown accounts
    /// contribute zero.
    pub async fn total_equity(&self, scope: Scope) -> Decimal {
        match scope {
            Scope::Account(account_id) => self
                .funding_plan(account_id)
                .await
                .map_or(Decimal::ZERO, |p| p.total_equity()),
            Scope::Portfolio => {
                let handles: Vec<_> = self.plans.read().await.values().cloned().collect();
                let mut total = Decimal::ZERO;
                for handle in handles {
                    total += handle.lock().await.total_equity();
                }
                total
            }
        }
    }

    /// Portfolio-wide capital aggregates.
    pub async fn portfolio_summary(&self) -> PortfolioSummary {
        let handles: Vec<_> = self.plans.read().await.values().cloned().collect();

        let mut available = Decimal::ZERO;
        let mut reserved = Decimal::ZERO;
        let mut deployed = Decimal::ZERO;
        for handle in &handles {
            let plan = handle.lock().await;
            available += plan.available_cash;
            reserved += plan.reserved_cash;
            deployed += plan.total_deployed;
        }

        let total = available + reserved + deployed;
        let utilization_percent = if total > Decimal::ZERO {
            deployed / total * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        PortfolioSummary {
            total_capital: total,
            total_available: available,
            total_reserved: reserved,
            total_deployed: deployed,
            utilization_percent,
            accounts_count: handles.len(),
        }
    }

    /// Audit trail for one account, oldest first.
    pub async fn transactions_for(&self, account_id: AccountId) -> Vec<CapitalTransaction> {
        self.transactions
            .lock()
            .await
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect()
    }

    async fn record(
        &self,
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Decimal,
        counterparty: Option<AccountId>,
        reason: impl Into<String>,
    ) {
        let transaction = CapitalTransaction {
            id: self.next_transaction_id.fetch_add(1, Ordering::Relaxed),
            account_id,
            transaction_type,
            amount,
            counterparty,
            reason: reason.into(),
            timestamp: Utc::now(),
        };
        self.transactions.lock().await.push(transaction);
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SipFrequency;
    use rust_decimal_macros::dec;

    async fn treasury_with(account_id: AccountId, available: Decimal) -> Treasury {
        let treasury = Treasury::new();
        treasury
            .open_account(FundingPlan::lump_sum(account_id, available, available))
            .await;
        treasury
    }

    #[tokio::test]
    async fn reserve_deploy_return_conserves_total() {
        let treasury = treasury_with(1, dec!(100000)).await;

        assert!(treasury.reserve(1, dec!(40000)).await.unwrap());
        treasury.deploy(1, dec!(40000)).await.unwrap();
        treasury.return_capital(1, dec!(40000), dec!(2500)).await.unwrap();

        let plan = treasury.funding_plan(1).await.unwrap();
        // Initial total plus realized P&L, nothing lost to the buckets.
        assert_eq!(plan.total_equity(), dec!(102500));
        assert_eq!(plan.reserved_cash, dec!(0));
        assert_eq!(plan.total_deployed, dec!(0));
    }

    #[tokio::test]
    async fn reserve_fails_without_sufficient_available_and_leaves_state_unchanged() {
        let treasury = treasury_with(1, dec!(1000)).await;

        assert!(!treasury.reserve(1, dec!(1000.01)).await.unwrap());

        let plan = treasury.funding_plan(1).await.unwrap();
        assert_eq!(plan.available_cash, dec!(1000));
        assert_eq!(plan.reserved_cash, dec!(0));

        // Exactly the full balance succeeds.
        assert!(treasury.reserve(1, dec!(1000)).await.unwrap());
    }

    #[tokio::test]
    async fn release_restores_available() {
        let treasury = treasury_with(1, dec!(5000)).await;
        assert!(treasury.reserve(1, dec!(3000)).await.unwrap());
        treasury.release(1, dec!(3000)).await.unwrap();

        let plan = treasury.funding_plan(1).await.unwrap();
        assert_eq!(plan.available_cash, dec!(5000));
        assert_eq!(plan.reserved_cash, dec!(0));
    }

    #[tokio::test]
    async fn overdraw_of_reserved_or_deployed_is_rejected() {
        let treasury = treasury_with(1, dec!(5000)).await;
        assert!(treasury.reserve(1, dec!(1000)).await.unwrap());

        let err = treasury.release(1, dec!(2000)).await.unwrap_err();
        assert!(matches!(err, LedgerError::WouldGoNegative { bucket: "reserved", .. }));

        let err = treasury.deploy(1, dec!(2000)).await.unwrap_err();
        assert!(matches!(err, LedgerError::WouldGoNegative { bucket: "reserved", .. }));

        let err = treasury.return_capital(1, dec!(100), dec!(0)).await.unwrap_err();
        assert!(matches!(err, LedgerError::WouldGoNegative { bucket: "deployed", .. }));

        // State untouched by the failed calls.
        let plan = treasury.funding_plan(1).await.unwrap();
        assert_eq!(plan.available_cash, dec!(4000));
        assert_eq!(plan.reserved_cash, dec!(1000));
    }

    #[tokio::test]
    async fn loss_larger_than_returned_capital_cannot_overdraw_available() {
        let treasury = treasury_with(1, dec!(1000)).await;
        assert!(treasury.reserve(1, dec!(1000)).await.unwrap());
        treasury.deploy(1, dec!(1000)).await.unwrap();

        // Returning 500 with a -600 loss would push available to -100.
        let err = treasury
            .return_capital(1, dec!(500), dec!(-600))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::WouldGoNegative { bucket: "available", .. }));

        // A loss covered by the returned amount is fine.
        treasury.return_capital(1, dec!(500), dec!(-400)).await.unwrap();
        let plan = treasury.funding_plan(1).await.unwrap();
        assert_eq!(plan.available_cash, dec!(100));
    }

    #[tokio::test]
    async fn realized_pnl_is_logged_as_a_transaction() {
        let treasury = treasury_with(1, dec!(10000)).await;
        assert!(treasury.reserve(1, dec!(4000)).await.unwrap());
        treasury.deploy(1, dec!(4000)).await.unwrap();
        treasury.return_capital(1, dec!(4000), dec!(-250)).await.unwrap();

        let transactions = treasury.transactions_for(1).await;
        let pnl: Vec<_> = transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::RealizedPnl)
            .collect();
        assert_eq!(pnl.len(), 1);
        assert_eq!(pnl[0].amount, dec!(-250));
    }

    #[tokio::test]
    async fn sip_installment_credits_and_logs() {
        let treasury = Treasury::new();
        treasury
            .open_account(FundingPlan::sip(7, dec!(10000), SipFrequency::Monthly))
            .await;

        let deposited = treasury.deposit_installment(7).await.unwrap();
        assert_eq!(deposited, Some(dec!(10000)));

        let plan = treasury.funding_plan(7).await.unwrap();
        assert_eq!(plan.available_cash, dec!(10000));

        let transactions = treasury.transactions_for(7).await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction_type, TransactionType::Deposit);
    }

    #[tokio::test]
    async fn sip_installment_is_noop_for_lump_sum_plans() {
        let treasury = treasury_with(1, dec!(1000)).await;
        assert_eq!(treasury.deposit_installment(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tranche_released_only_when_utilized_and_low_on_cash() {
        let treasury = Treasury::new();
        treasury
            .open_account(FundingPlan::lump_sum(1, dec!(100000), dec!(100000)))
            .await;

        // Flush most of the cash into deployment: 85% utilized, 5% available.
        assert!(treasury.reserve(1, dec!(95000)).await.unwrap());
        treasury.deploy(1, dec!(85000)).await.unwrap();
        treasury.release(1, dec!(10000)).await.unwrap();
        // available = 15000 -> still above the 10% floor, no release.
        assert_eq!(treasury.release_next_tranche(1).await.unwrap(), None);

        assert!(treasury.reserve(1, dec!(9000)).await.unwrap());
        // available = 6000 < 10000 and utilization 85% > 80%.
        let released = treasury.release_next_tranche(1).await.unwrap();
        assert_eq!(released, Some(dec!(33000.00)));

        let plan = treasury.funding_plan(1).await.unwrap();
        assert_eq!(plan.available_cash, dec!(39000.00));
    }

    #[tokio::test]
    async fn transfer_debits_and_credits_atomically_with_paired_rows() {
        let treasury = Treasury::new();
        treasury
            .open_account(FundingPlan::lump_sum(1, dec!(50000), dec!(50000)))
            .await;
        treasury
            .open_account(FundingPlan::lump_sum(2, dec!(10000), dec!(10000)))
            .await;

        treasury.transfer(1, 2, dec!(20000), "Rebalance").await.unwrap();

        assert_eq!(
            treasury.funding_plan(1).await.unwrap().available_cash,
            dec!(30000)
        );
        assert_eq!(
            treasury.funding_plan(2).await.unwrap().available_cash,
            dec!(30000)
        );

        let out = treasury.transactions_for(1).await;
        assert!(out
            .iter()
            .any(|t| t.transaction_type == TransactionType::TransferOut
                && t.counterparty == Some(2)));
        let incoming = treasury.transactions_for(2).await;
        assert!(incoming
            .iter()
            .any(|t| t.transaction_type == TransactionType::TransferIn
                && t.counterparty == Some(1)));
    }

    #[tokio::test]
    async fn transfer_rejects_shortfall_and_self_transfer() {
        let treasury = Treasury::new();
        treasury
            .open_account(FundingPlan::lump_sum(1, dec!(100), dec!(100)))
            .await;
        treasury
            .open_account(FundingPlan::lump_sum(2, dec!(0), dec!(0)))
            .await;

        let err = treasury.transfer(1, 2, dec!(500), "too much").await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // Neither side moved.
        assert_eq!(treasury.funding_plan(1).await.unwrap().available_cash, dec!(100));
        assert_eq!(treasury.funding_plan(2).await.unwrap().available_cash, dec!(0));

        let err = treasury.transfer(1, 1, dec!(10), "loop").await.unwrap_err();
        assert!(matches!(err, LedgerError::SelfTransfer(1)));
    }

    #[tokio::test]
    async fn opposing_transfers_do_not_deadlock() {
        let treasury = Arc::new(Treasury::new());
        treasury
            .open_account(FundingPlan::lump_sum(1, dec!(10000), dec!(10000)))
            .await;
        treasury
            .open_account(FundingPlan::lump_sum(2, dec!(10000), dec!(10000)))
            .await;

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let t = Arc::clone(&treasury);
            tasks.push(tokio::spawn(async move {
                t.transfer(1, 2, dec!(10), "ping").await.unwrap();
            }));
            let t = Arc::clone(&treasury);
            tasks.push(tokio::spawn(async move {
                t.transfer(2, 1, dec!(10), "pong").await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // Equal flows in both directions: balances end where they started.
        assert_eq!(treasury.funding_plan(1).await.unwrap().available_cash, dec!(10000));
        assert_eq!(treasury.funding_plan(2).await.unwrap().available_cash, dec!(10000));
    }

    #[tokio::test]
    async fn deployable_cash_applies_emergency_buffer() {
        let treasury = treasury_with(1, dec!(10000)).await;
        // Default 5% buffer.
        assert_eq!(treasury.deployable_cash(1).await.unwrap(), dec!(9500.00));
    }

    #[tokio::test]
    async fn portfolio_summary_aggregates_and_computes_utilization() {
        let treasury = Treasury::new();
        treasury
            .open_account(FundingPlan::lump_sum(1, dec!(60000), dec!(60000)))
            .await;
        treasury
            .open_account(FundingPlan::lump_sum(2, dec!(40000), dec!(40000)))
            .await;
        assert!(treasury.reserve(1, dec!(25000)).await.unwrap());
        treasury.deploy(1, dec!(25000)).await.unwrap();

        let summary = treasury.portfolio_summary().await;
        assert_eq!(summary.accounts_count, 2);
        assert_eq!(summary.total_capital, dec!(100000));
        assert_eq!(summary.total_deployed, dec!(25000));
        assert_eq!(summary.utilization_percent, dec!(25));
    }

    #[tokio::test]
    async fn operations_on_unknown_accounts_fail() {
        let treasury = Treasury::new();
        assert!(matches!(
            treasury.reserve(99, dec!(1)).await.unwrap_err(),
            LedgerError::UnknownAccount(99)
        ));
        assert!(treasury.funding_plan(99).await.is_none());
        assert_eq!(treasury.total_capital(99).await, None);
    }

    #[tokio::test]
    async fn non_positive_amounts_are_rejected() {
        let treasury = treasury_with(1, dec!(1000)).await;
        assert!(matches!(
            treasury.reserve(1, dec!(0)).await.unwrap_err(),
            LedgerError::NonPositiveAmount(_)
        ));
        assert!(matches!(
            treasury.withdraw(1, dec!(-5)).await.unwrap_err(),
            LedgerError::NonPositiveAmount(_)
        ));
    }
}
