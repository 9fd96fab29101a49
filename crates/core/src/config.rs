use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level desk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub guardrails: GuardrailConfig,
    pub allocator: AllocatorConfig,
    pub kill_switches: KillSwitchConfig,
}

/// Thresholds for the six pre-trade guardrail checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Sessions of volume history used for the ADV average.
    pub adv_lookback_sessions: u32,
    /// Maximum trade size as a fraction of ADV.
    pub max_trade_to_adv_ratio: Decimal,
    /// Blackout days around an event when no mandate specifies one.
    pub default_event_blackout_days: i64,
    /// Sector exposure cap (percent) when no mandate specifies one.
    pub default_sector_exposure_max: Decimal,
    /// Maximum catalyst age for the hot path, in hours.
    pub catalyst_freshness_hours: i64,
    /// Capital assumed when the ledger has no usable total for an account.
    pub fallback_total_capital: Decimal,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            adv_lookback_sessions: 20,
            max_trade_to_adv_ratio: Decimal::new(5, 2), // 5%
            default_event_blackout_days: 2,
            default_sector_exposure_max: Decimal::from(30),
            catalyst_freshness_hours: 24,
            fallback_total_capital: Decimal::from(100_000),
        }
    }
}

/// Allocator filtering and sizing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Maximum sized opportunities emitted per account per pass.
    pub max_cards: usize,
    /// Signals below this quality score are dropped.
    pub min_quality_score: f64,
    /// Single-position value cap as a percent of total capital.
    pub max_position_percent: Decimal,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_cards: 5,
            min_quality_score: 0.5,
            max_position_percent: Decimal::from(10),
        }
    }
}

/// Default kill-switch thresholds installed at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KillSwitchConfig {
    /// Daily loss trigger as a percent of total capital.
    pub max_daily_loss_percent: f64,
    pub daily_loss_auto_reset_minutes: i64,
    /// Drawdown trigger as a percent drop from intraday peak equity.
    pub max_drawdown_percent: f64,
    pub drawdown_auto_reset_minutes: i64,
}

impl Default for KillSwitchConfig {
    fn default() -> Self {
        Self {
            max_daily_loss_percent: 5.0,
            daily_loss_auto_reset_minutes: 60,
            max_drawdown_percent: 15.0,
            drawdown_auto_reset_minutes: 1440,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn guardrail_defaults_match_policy() {
        let config = GuardrailConfig::default();
        assert_eq!(config.adv_lookback_sessions, 20);
        assert_eq!(config.max_trade_to_adv_ratio, dec!(0.05));
        assert_eq!(config.default_event_blackout_days, 2);
        assert_eq!(config.default_sector_exposure_max, dec!(30));
        assert_eq!(config.catalyst_freshness_hours, 24);
    }

    #[test]
    fn allocator_defaults() {
        let config = AllocatorConfig::default();
        assert_eq!(config.max_cards, 5);
        assert_eq!(config.max_position_percent, dec!(10));
    }
}
