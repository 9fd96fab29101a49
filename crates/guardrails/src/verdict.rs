//! Verdict types: per-check booleans, warnings, and the aggregate result.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trade_desk_core::{AccountId, Direction};

/// Warning codes emitted by the guardrail checks.
pub mod codes {
    pub const INSUFFICIENT_VOLUME_DATA: &str = "INSUFFICIENT_VOLUME_DATA";
    pub const LIQUIDITY_BELOW_THRESHOLD: &str = "LIQUIDITY_BELOW_THRESHOLD";
    pub const LIQUIDITY_CHECK_ERROR: &str = "LIQUIDITY_CHECK_ERROR";
    pub const POSITION_SIZE_EXCEEDED: &str = "POSITION_SIZE_EXCEEDED";
    pub const POSITION_SIZE_CHECK_ERROR: &str = "POSITION_SIZE_CHECK_ERROR";
    pub const SECTOR_UNKNOWN: &str = "SECTOR_UNKNOWN";
    pub const SECTOR_BANNED: &str = "SECTOR_BANNED";
    pub const SECTOR_EXPOSURE_EXCEEDED: &str = "SECTOR_EXPOSURE_EXCEEDED";
    pub const SECTOR_CHECK_ERROR: &str = "SECTOR_CHECK_ERROR";
    pub const EVENT_WINDOW_WARNING: &str = "EVENT_WINDOW_WARNING";
    pub const EVENT_WINDOW_CHECK_ERROR: &str = "EVENT_WINDOW_CHECK_ERROR";
    pub const REGIME_UNKNOWN: &str = "REGIME_UNKNOWN";
    pub const REGIME_CHECK_ERROR: &str = "REGIME_CHECK_ERROR";
    pub const CATALYST_STALE: &str = "CATALYST_STALE";
    pub const CATALYST_CHECK_ERROR: &str = "CATALYST_CHECK_ERROR";
}

/// Warning severity. Only `Critical` blocks on its own; `Warning` and `Info`
/// annotate the verdict. Ordered so that `max()` yields the worst severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A single annotation attached to a verdict by one check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWarning {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl RiskWarning {
    #[must_use]
    pub fn new(severity: Severity, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn critical(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, code, message)
    }

    #[must_use]
    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    #[must_use]
    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Input to one guardrail evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeCheck {
    pub symbol: String,
    pub exchange: String,
    pub direction: Direction,
    pub quantity: i64,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub account_id: Option<AccountId>,
    pub sector: Option<String>,
    /// Triggering catalyst for hot-path trades; enables the freshness check.
    pub event_id: Option<i64>,
}

/// Aggregated result of the six checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub liquidity_check: bool,
    pub position_size_check: bool,
    pub exposure_check: bool,
    pub event_window_check: bool,
    pub regime_check: bool,
    pub catalyst_freshness_check: bool,
    pub risk_warnings: Vec<RiskWarning>,
    /// All six booleans true AND no critical warning.
    pub passed_all: bool,
    pub has_critical_failures: bool,
    pub timestamp: DateTime<Utc>,
    pub account_id: Option<AccountId>,
    pub symbol: String,
    pub evaluation_duration_ms: f64,
}

impl GuardrailVerdict {
    /// Code of the first critical warning, in check order.
    #[must_use]
    pub fn first_critical_code(&self) -> Option<&str> {
        self.risk_warnings
            .iter()
            .find(|w| w.severity == Severity::Critical)
            .map(|w| w.code.as_str())
    }

    /// Worst severity across all warnings.
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.risk_warnings.iter().map(|w| w.severity).max()
    }
}

/// Risk/reward arithmetic for a proposed trade, independent of the checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub position_value: Decimal,
    pub total_risk: Decimal,
    pub total_reward: Decimal,
    pub risk_per_share: Decimal,
    pub reward_per_share: Decimal,
    /// Reward divided by risk; zero when the stop sits on the entry.
    pub risk_reward_ratio: Decimal,
}

impl RiskSummary {
    #[must_use]
    pub fn compute(
        entry_price: Decimal,
        stop_loss: Decimal,
        target_price: Decimal,
        quantity: i64,
    ) -> Self {
        let quantity = Decimal::from(quantity);
        let risk_per_share = (entry_price - stop_loss).abs();
        let reward_per_share = (target_price - entry_price).abs();
        let total_risk = risk_per_share * quantity;
        let total_reward = reward_per_share * quantity;
        let risk_reward_ratio = if risk_per_share.is_zero() {
            Decimal::ZERO
        } else {
            reward_per_share / risk_per_share
        };
        Self {
            position_value: entry_price * quantity,
            total_risk,
            total_reward,
            risk_per_share,
            reward_per_share,
            risk_reward_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn severity_orders_critical_highest() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        let worst = [Severity::Info, Severity::Critical, Severity::Warning]
            .into_iter()
            .max();
        assert_eq!(worst, Some(Severity::Critical));
    }

    #[test]
    fn warning_serializes_with_screaming_severity() {
        let warning = RiskWarning::critical(codes::CATALYST_STALE, "Event catalyst is stale");
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["code"], "CATALYST_STALE");
        // Null details are omitted from the wire form.
        assert!(json.get("details").is_none());
    }

    #[test]
    fn first_critical_code_respects_check_order() {
        let verdict = GuardrailVerdict {
            liquidity_check: false,
            position_size_check: false,
            exposure_check: true,
            event_window_check: true,
            regime_check: true,
            catalyst_freshness_check: true,
            risk_warnings: vec![
                RiskWarning::warning(codes::INSUFFICIENT_VOLUME_DATA, "no history"),
                RiskWarning::critical(codes::POSITION_SIZE_EXCEEDED, "over limit"),
                RiskWarning::critical(codes::SECTOR_BANNED, "banned"),
            ],
            passed_all: false,
            has_critical_failures: true,
            timestamp: Utc::now(),
            account_id: Some(1),
            symbol: "TCS".to_string(),
            evaluation_duration_ms: 1.0,
        };
        assert_eq!(
            verdict.first_critical_code(),
            Some(codes::POSITION_SIZE_EXCEEDED)
        );
        assert_eq!(verdict.max_severity(), Some(Severity::Critical));
    }

    #[test]
    fn risk_summary_computes_ratio() {
        let summary = RiskSummary::compute(dec!(100), dec!(95), dec!(110), 20);
        assert_eq!(summary.position_value, dec!(2000));
        assert_eq!(summary.total_risk, dec!(100));
        assert_eq!(summary.total_reward, dec!(200));
        assert_eq!(summary.risk_per_share, dec!(5));
        assert_eq!(summary.reward_per_share, dec!(10));
        assert_eq!(summary.risk_reward_ratio, dec!(2));
    }

    #[test]
    fn risk_summary_with_stop_on_entry_has_zero_ratio() {
        let summary = RiskSummary::compute(dec!(100), dec!(100), dec!(110), 10);
        assert_eq!(summary.total_risk, dec!(0));
        assert_eq!(summary.risk_reward_ratio, dec!(0));
    }
}
