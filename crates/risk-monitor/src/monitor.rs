//! The monitor: snapshot capture, switch evaluation, pause gating.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use trade_desk_core::{KillSwitchConfig, PositionProvider, ProviderError, Scope};
use trade_desk_treasury::Treasury;

use crate::switch::{
    KillSwitch, RiskMetrics, RiskSnapshot, SwitchType, TriggerAction, TriggeredSwitch,
};

/// Evaluates kill switches against live ledger and position state.
///
/// Auto-resets are applied lazily, at the start of every evaluation or
/// pause query, so a switch whose window has elapsed re-arms without a
/// background task.
pub struct KillSwitchMonitor {
    treasury: Arc<Treasury>,
    positions: Arc<dyn PositionProvider>,
    switches: RwLock<Vec<KillSwitch>>,
    snapshots: RwLock<Vec<RiskSnapshot>>,
    /// Intraday peak equity per scope; the peak resets each UTC day.
    peaks: RwLock<HashMap<Scope, (NaiveDate, Decimal)>>,
    next_switch_id: AtomicU64,
}

impl KillSwitchMonitor {
    /// Creates the monitor with the two portfolio-wide default switches
    /// installed: MAX_DAILY_LOSS and MAX_DRAWDOWN.
    #[must_use]
    pub fn new(
        config: &KillSwitchConfig,
        treasury: Arc<Treasury>,
        positions: Arc<dyn PositionProvider>,
    ) -> Self {
        let mut defaults = vec![
            KillSwitch::max_daily_loss(Scope::Portfolio, config),
            KillSwitch::max_drawdown(Scope::Portfolio, config),
        ];
        for (index, switch) in defaults.iter_mut().enumerate() {
            switch.id = index as u64 + 1;
        }
        let next_id = defaults.len() as u64 + 1;
        tracing::info!(count = defaults.len(), "Installed default kill switches");

        Self {
            treasury,
            positions,
            switches: RwLock::new(defaults),
            snapshots: RwLock::new(Vec::new()),
            peaks: RwLock::new(HashMap::new()),
            next_switch_id: AtomicU64::new(next_id),
        }
    }

    /// Installs an additional switch (e.g. account-scoped, or a new type)
    /// and returns its assigned id.
    pub async fn add_switch(&self, mut switch: KillSwitch) -> u64 {
        let id = self.next_switch_id.fetch_add(1, Ordering::Relaxed);
        switch.id = id;
        self.switches.write().await.push(switch);
        id
    }

    /// Captures and records an immutable risk snapshot for the scope.
    pub async fn capture_snapshot(&self, scope: Scope) -> Result<RiskSnapshot, ProviderError> {
        let open = self.positions.open_positions(scope).await?;
        let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let closed_today = self.positions.closed_since(scope, today_start).await?;

        let total_open_risk: Decimal = open.iter().map(|p| p.risk_amount).sum();
        let total_unrealized_pnl: Decimal = open.iter().map(|p| p.unrealized_pnl).sum();
        let daily_realized_pnl: Decimal = closed_today.iter().map(|p| p.realized_pnl).sum();

        let current_equity = self.treasury.total_equity(scope).await + total_unrealized_pnl;
        let peak_equity = self.update_peak(scope, current_equity).await;

        let triggered_switches = self
            .switches
            .read()
            .await
            .iter()
            .filter(|s| s.is_active && s.is_triggered)
            .map(|s| s.switch_type)
            .collect();

        let snapshot = RiskSnapshot {
            scope,
            total_open_risk,
            total_unrealized_pnl,
            open_positions_count: open.len(),
            daily_realized_pnl,
            current_equity,
            peak_equity,
            triggered_switches,
            timestamp: Utc::now(),
        };
        self.snapshots.write().await.push(snapshot.clone());
        Ok(snapshot)
    }

    /// Takes a fresh snapshot and evaluates every armed switch in the
    /// scope. Returns the switches that fired on this evaluation; already
    /// triggered switches are never re-triggered.
    pub async fn check_kill_switches(
        &self,
        scope: Scope,
    ) -> Result<Vec<TriggeredSwitch>, ProviderError> {
        self.apply_auto_resets().await;
        let snapshot = self.capture_snapshot(scope).await?;
        let total_capital = self.treasury.total_equity(scope).await;

        let mut triggered = Vec::new();
        let mut switches = self.switches.write().await;
        for switch in switches
            .iter_mut()
            .filter(|s| s.is_active && !s.is_triggered && s.scope == scope)
        {
            let Some(actual_value) = breach_value(switch, &snapshot, total_capital) else {
                continue;
            };
            switch.is_triggered = true;
            switch.triggered_at = Some(Utc::now());
            switch.triggered_value = Some(actual_value);

            tracing::warn!(
                switch_type = %switch.switch_type,
                threshold = switch.threshold_value,
                actual = actual_value,
                ?scope,
                "Kill switch triggered"
            );
            triggered.push(TriggeredSwitch {
                switch_id: switch.id,
                switch_type: switch.switch_type,
                threshold: switch.threshold_value,
                actual_value,
                actions: switch.action_on_trigger,
                message: format!(
                    "{} breached: {:.2}% >= {}%",
                    switch.switch_type, actual_value, switch.threshold_value
                ),
            });
        }
        Ok(triggered)
    }

    /// Whether the allocator must hold back new entries for this scope.
    /// Portfolio-wide switches gate every account.
    pub async fn should_pause_new_entries(&self, scope: Scope) -> bool {
        self.apply_auto_resets().await;
        self.switches.read().await.iter().any(|s| {
            s.is_active
                && s.is_triggered
                && s.action_on_trigger.pause_new_entries
                && (s.scope == scope || s.scope == Scope::Portfolio)
        })
    }

    /// Manually re-arms a triggered switch. Returns false if no switch has
    /// that id.
    pub async fn reset_switch(&self, switch_id: u64) -> bool {
        let mut switches = self.switches.write().await;
        let Some(switch) = switches.iter_mut().find(|s| s.id == switch_id) else {
            return false;
        };
        switch.is_triggered = false;
        switch.triggered_at = None;
        switch.triggered_value = None;
        tracing::info!(switch_type = %switch.switch_type, switch_id, "Reset kill switch");
        true
    }

    /// Current risk metrics for the scope, including pause state.
    pub async fn risk_metrics(&self, scope: Scope) -> Result<RiskMetrics, ProviderError> {
        let snapshot = self.capture_snapshot(scope).await?;
        let is_paused = self.should_pause_new_entries(scope).await;
        let total_capital = self.treasury.total_equity(scope).await;

        let percent_of_capital = |value: Decimal| {
            if total_capital > Decimal::ZERO {
                (value / total_capital * Decimal::from(100))
                    .to_f64()
                    .unwrap_or(0.0)
            } else {
                0.0
            }
        };

        Ok(RiskMetrics {
            total_capital,
            open_risk: snapshot.total_open_risk,
            open_risk_percent: percent_of_capital(snapshot.total_open_risk),
            unrealized_pnl: snapshot.total_unrealized_pnl,
            unrealized_pnl_percent: percent_of_capital(snapshot.total_unrealized_pnl),
            open_positions: snapshot.open_positions_count,
            daily_pnl: snapshot.daily_realized_pnl + snapshot.total_unrealized_pnl,
            is_paused,
            timestamp: snapshot.timestamp,
        })
    }

    /// All configured switches, for inspection.
    pub async fn switches(&self) -> Vec<KillSwitch> {
        self.switches.read().await.clone()
    }

    /// Recorded snapshots for a scope, oldest first.
    pub async fn snapshots_for(&self, scope: Scope) -> Vec<RiskSnapshot> {
        self.snapshots
            .read()
            .await
            .iter()
            .filter(|s| s.scope == scope)
            .cloned()
            .collect()
    }

    async fn apply_auto_resets(&self) {
        let now = Utc::now();
        let mut switches = self.switches.write().await;
        for switch in switches.iter_mut() {
            if switch.auto_reset_due(now) {
                tracing::info!(
                    switch_type = %switch.switch_type,
                    switch_id = switch.id,
                    "Kill switch auto-reset"
                );
                switch.is_triggered = false;
                switch.triggered_at = None;
                switch.triggered_value = None;
            }
        }
    }

    async fn update_peak(&self, scope: Scope, equity: Decimal) -> Decimal {
        let today = Utc::now().date_naive();
        let mut peaks = self.peaks.write().await;
        let entry = peaks.entry(scope).or_insert((today, equity));
        if entry.0 != today {
            // New session: the peak starts fresh at current equity.
            *entry = (today, equity);
        } else if equity > entry.1 {
            entry.1 = equity;
        }
        entry.1
    }
}

/// The metric value if the switch's threshold is breached, else `None`.
/// With no capital there is nothing to measure against.
fn breach_value(
    switch: &KillSwitch,
    snapshot: &RiskSnapshot,
    total_capital: Decimal,
) -> Option<f64> {
    if total_capital <= Decimal::ZERO {
        return None;
    }
    match switch.switch_type {
        SwitchType::MaxDailyLoss => {
            let combined = snapshot.daily_realized_pnl + snapshot.total_unrealized_pnl;
            if combined >= Decimal::ZERO {
                return None;
            }
            let loss_percent = (combined.abs() / total_capital * Decimal::from(100)).to_f64()?;
            (loss_percent >= switch.threshold_value).then_some(loss_percent)
        }
        SwitchType::MaxDrawdown => {
            if snapshot.peak_equity <= Decimal::ZERO
                || snapshot.current_equity >= snapshot.peak_equity
            {
                return None;
            }
            let drawdown_percent = ((snapshot.peak_equity - snapshot.current_equity)
                / snapshot.peak_equity
                * Decimal::from(100))
            .to_f64()?;
            (drawdown_percent >= switch.threshold_value).then_some(drawdown_percent)
        }
    }
}
