//! Kill-switch and snapshot types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trade_desk_core::{KillSwitchConfig, Scope};

/// Metric a switch watches. New switch types extend this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchType {
    /// Today's combined realized + unrealized loss as a percent of capital.
    MaxDailyLoss,
    /// Percent drop from the intraday peak equity.
    MaxDrawdown,
}

impl std::fmt::Display for SwitchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MaxDailyLoss => "MAX_DAILY_LOSS",
            Self::MaxDrawdown => "MAX_DRAWDOWN",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdType {
    Percentage,
    Absolute,
}

/// What happens when a switch fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerAction {
    pub pause_new_entries: bool,
    pub close_all: bool,
    pub alert_user: bool,
}

/// A threshold-triggered trading pause. Created at process start or via
/// `KillSwitchMonitor::add_switch`; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillSwitch {
    pub id: u64,
    pub scope: Scope,
    pub switch_type: SwitchType,
    pub threshold_value: f64,
    pub threshold_type: ThresholdType,
    pub action_on_trigger: TriggerAction,
    /// Minutes after triggering before the switch re-arms itself; zero
    /// means manual reset only.
    pub auto_reset_minutes: i64,
    pub is_active: bool,
    pub is_triggered: bool,
    /// Set only on the false→true transition, cleared only by reset.
    pub triggered_at: Option<DateTime<Utc>>,
    pub triggered_value: Option<f64>,
}

impl KillSwitch {
    #[must_use]
    pub fn max_daily_loss(scope: Scope, config: &KillSwitchConfig) -> Self {
        Self::percentage(
            scope,
            SwitchType::MaxDailyLoss,
            config.max_daily_loss_percent,
            config.daily_loss_auto_reset_minutes,
        )
    }

    #[must_use]
    pub fn max_drawdown(scope: Scope, config: &KillSwitchConfig) -> Self {
        Self::percentage(
            scope,
            SwitchType::MaxDrawdown,
            config.max_drawdown_percent,
            config.drawdown_auto_reset_minutes,
        )
    }

    fn percentage(
        scope: Scope,
        switch_type: SwitchType,
        threshold_value: f64,
        auto_reset_minutes: i64,
    ) -> Self {
        Self {
            id: 0,
            scope,
            switch_type,
            threshold_value,
            threshold_type: ThresholdType::Percentage,
            action_on_trigger: TriggerAction {
                pause_new_entries: true,
                close_all: false,
                alert_user: true,
            },
            auto_reset_minutes,
            is_active: true,
            is_triggered: false,
            triggered_at: None,
            triggered_value: None,
        }
    }

    /// Whether the auto-reset window has elapsed since triggering.
    #[must_use]
    pub fn auto_reset_due(&self, now: DateTime<Utc>) -> bool {
        if !self.is_triggered || self.auto_reset_minutes <= 0 {
            return false;
        }
        self.triggered_at
            .is_some_and(|at| now - at >= chrono::Duration::minutes(self.auto_reset_minutes))
    }
}

/// A switch that fired during one evaluation, with its configured actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggeredSwitch {
    pub switch_id: u64,
    pub switch_type: SwitchType,
    pub threshold: f64,
    pub actual_value: f64,
    pub actions: TriggerAction,
    pub message: String,
}

/// Immutable point-in-time risk record for a scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub scope: Scope,
    pub total_open_risk: Decimal,
    pub total_unrealized_pnl: Decimal,
    pub open_positions_count: usize,
    /// Realized P&L from positions closed since the UTC start of day.
    pub daily_realized_pnl: Decimal,
    /// Ledger equity plus unrealized P&L at capture time.
    pub current_equity: Decimal,
    /// Highest equity seen for this scope today.
    pub peak_equity: Decimal,
    pub triggered_switches: Vec<SwitchType>,
    pub timestamp: DateTime<Utc>,
}

/// Current risk metrics for an account or the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub total_capital: Decimal,
    pub open_risk: Decimal,
    pub open_risk_percent: f64,
    pub unrealized_pnl: Decimal,
    pub unrealized_pnl_percent: f64,
    pub open_positions: usize,
    pub daily_pnl: Decimal,
    pub is_paused: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pause_but_never_liquidate() {
        let config = KillSwitchConfig::default();
        let daily = KillSwitch::max_daily_loss(Scope::Portfolio, &config);
        let drawdown = KillSwitch::max_drawdown(Scope::Portfolio, &config);

        assert_eq!(daily.threshold_value, 5.0);
        assert_eq!(daily.auto_reset_minutes, 60);
        assert_eq!(drawdown.threshold_value, 15.0);
        assert_eq!(drawdown.auto_reset_minutes, 1440);
        for switch in [daily, drawdown] {
            assert!(switch.is_active);
            assert!(!switch.is_triggered);
            assert!(switch.action_on_trigger.pause_new_entries);
            assert!(!switch.action_on_trigger.close_all);
            assert!(switch.action_on_trigger.alert_user);
        }
    }

    #[test]
    fn auto_reset_due_requires_elapsed_window() {
        let mut switch = KillSwitch::max_daily_loss(Scope::Portfolio, &KillSwitchConfig::default());
        let now = Utc::now();

        assert!(!switch.auto_reset_due(now));

        switch.is_triggered = true;
        switch.triggered_at = Some(now - chrono::Duration::minutes(30));
        assert!(!switch.auto_reset_due(now));

        switch.triggered_at = Some(now - chrono::Duration::minutes(61));
        assert!(switch.auto_reset_due(now));

        // Zero means manual reset only.
        switch.auto_reset_minutes = 0;
        assert!(!switch.auto_reset_due(now));
    }
}
