//! Filter → rank → size, per account.

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use trade_desk_core::{
    AccountId, AllocatorConfig, CandidateSignal, Direction, FeatureProvider, Mandate,
    MandateProvider, MarketDataProvider, Objective, PositionProvider, ProviderError, Scope,
};
use trade_desk_risk_monitor::KillSwitchMonitor;
use trade_desk_treasury::Treasury;

use crate::types::{PositionLimits, SectorCheck, SizedOpportunity};

/// ATR substitute as a fraction of price when no feature snapshot exists.
const FALLBACK_ATR_FRACTION: Decimal = Decimal::from_parts(2, 0, 0, false, 2); // 0.02

pub struct Allocator {
    config: AllocatorConfig,
    treasury: Arc<Treasury>,
    monitor: Arc<KillSwitchMonitor>,
    market_data: Arc<dyn MarketDataProvider>,
    features: Arc<dyn FeatureProvider>,
    positions: Arc<dyn PositionProvider>,
    mandates: Arc<dyn MandateProvider>,
}

impl Allocator {
    pub fn new(
        config: AllocatorConfig,
        treasury: Arc<Treasury>,
        monitor: Arc<KillSwitchMonitor>,
        market_data: Arc<dyn MarketDataProvider>,
        features: Arc<dyn FeatureProvider>,
        positions: Arc<dyn PositionProvider>,
        mandates: Arc<dyn MandateProvider>,
    ) -> Self {
        Self {
            config,
            treasury,
            monitor,
            market_data,
            features,
            positions,
            mandates,
        }
    }

    /// Turns the candidate pool into sized opportunities for one account.
    ///
    /// Returns empty when the account is paused by a kill switch, has no
    /// active mandate, or has no available cash. A symbol whose market data
    /// cannot be fetched is skipped; the rest of the batch proceeds.
    pub async fn allocate_for_account(
        &self,
        account_id: AccountId,
        candidates: &[CandidateSignal],
    ) -> Result<Vec<SizedOpportunity>, ProviderError> {
        if self
            .monitor
            .should_pause_new_entries(Scope::Account(account_id))
            .await
        {
            tracing::warn!(account_id, "New entries paused by kill switch");
            return Ok(Vec::new());
        }

        let Some(mandate) = self.mandates.active_mandate(account_id).await? else {
            tracing::warn!(account_id, "No active mandate");
            return Ok(Vec::new());
        };
        let Some(plan) = self.treasury.funding_plan(account_id).await else {
            tracing::warn!(account_id, "No funding plan");
            return Ok(Vec::new());
        };
        if plan.available_cash <= Decimal::ZERO {
            tracing::warn!(account_id, "No available cash");
            return Ok(Vec::new());
        }

        let mut filtered = filter_by_mandate(candidates, &mandate, self.config.min_quality_score);
        if filtered.is_empty() {
            tracing::info!(account_id, "No signals passed the mandate filter");
            return Ok(Vec::new());
        }
        rank_by_objective(&mut filtered, mandate.objective);

        let total_capital = plan.total_capital();
        let mut opportunities = Vec::new();
        for signal in filtered.into_iter().take(self.config.max_cards) {
            if let Some(sized) = self
                .size_position(signal, &mandate, total_capital, plan.available_cash)
                .await
            {
                opportunities.push(sized);
            }
        }

        tracing::info!(
            account_id,
            count = opportunities.len(),
            "Allocated opportunities"
        );
        Ok(opportunities)
    }

    /// Sizes one signal from risk budget, volatility, and capital caps.
    async fn size_position(
        &self,
        signal: &CandidateSignal,
        mandate: &Mandate,
        total_capital: Decimal,
        available_cash: Decimal,
    ) -> Option<SizedOpportunity> {
        let entry_price = match self
            .market_data
            .latest_close(&signal.symbol, &signal.exchange)
            .await
        {
            Ok(Some(price)) if price > Decimal::ZERO => price,
            Ok(_) => {
                tracing::warn!(symbol = %signal.symbol, "No price data; skipping");
                return None;
            }
            Err(err) => {
                tracing::warn!(symbol = %signal.symbol, error = %err, "Price lookup failed; skipping");
                return None;
            }
        };

        let atr = match self.features.latest_features(&signal.symbol).await {
            Ok(Some(features)) => features.atr_14d.filter(|atr| *atr > Decimal::ZERO),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(symbol = %signal.symbol, error = %err, "Feature lookup failed; deriving ATR from price");
                None
            }
        }
        .unwrap_or_else(|| entry_price * FALLBACK_ATR_FRACTION);

        let stop_distance = atr * mandate.sl_multiplier;
        let target_distance = atr * mandate.tp_multiplier;
        if stop_distance <= Decimal::ZERO {
            tracing::warn!(symbol = %signal.symbol, "Non-positive stop distance; skipping");
            return None;
        }
        let (stop_loss, take_profit) = match signal.direction {
            Direction::Long => (entry_price - stop_distance, entry_price + target_distance),
            Direction::Short => (entry_price + stop_distance, entry_price - target_distance),
        };

        // Risk budget sets the raw quantity...
        let max_risk_amount = total_capital * mandate.risk_per_trade_percent / Decimal::from(100);
        let mut quantity = whole_units(max_risk_amount / stop_distance);
        if quantity < 1 {
            tracing::warn!(symbol = %signal.symbol, "Quantity too small; skipping");
            return None;
        }

        // ...then the per-position cap and available cash shrink it.
        let max_position_value =
            total_capital * self.config.max_position_percent / Decimal::from(100);
        if entry_price * Decimal::from(quantity) > max_position_value {
            quantity = whole_units(max_position_value / entry_price);
        }
        if entry_price * Decimal::from(quantity) > available_cash {
            quantity = whole_units(available_cash / entry_price);
        }
        if quantity < 1 {
            tracing::warn!(symbol = %signal.symbol, "Insufficient cash; skipping");
            return None;
        }

        let units = Decimal::from(quantity);
        let risk_amount = stop_distance * units;
        let reward_amount = target_distance * units;

        Some(SizedOpportunity {
            signal_id: signal.id,
            symbol: signal.symbol.clone(),
            exchange: signal.exchange.clone(),
            direction: signal.direction,
            entry_price,
            quantity,
            position_value: entry_price * units,
            stop_loss,
            take_profit,
            risk_amount,
            reward_amount,
            risk_reward_ratio: reward_amount / risk_amount,
            edge: signal.edge,
            confidence: signal.confidence,
            horizon_days: signal.horizon_days,
        })
    }

    /// Open-position count against the mandate's `max_positions`.
    pub async fn check_position_limits(
        &self,
        account_id: AccountId,
    ) -> Result<PositionLimits, ProviderError> {
        let Some(mandate) = self.mandates.active_mandate(account_id).await? else {
            return Ok(PositionLimits {
                can_add: false,
                current_positions: 0,
                max_positions: 0,
                available_slots: 0,
                reason: Some("No active mandate".to_string()),
            });
        };

        let current_positions = self
            .positions
            .open_positions(Scope::Account(account_id))
            .await?
            .len();
        let available_slots = i64::from(mandate.max_positions) - current_positions as i64;

        Ok(PositionLimits {
            can_add: available_slots > 0,
            current_positions,
            max_positions: mandate.max_positions,
            available_slots,
            reason: None,
        })
    }

    /// Banned-sector short-circuit. The numeric exposure math belongs to
    /// the guardrails.
    pub async fn check_sector_exposure(
        &self,
        account_id: AccountId,
        sector: &str,
    ) -> Result<SectorCheck, ProviderError> {
        let Some(mandate) = self.mandates.active_mandate(account_id).await? else {
            return Ok(SectorCheck {
                can_add: false,
                reason: Some("No active mandate".to_string()),
                max_allowed_percent: None,
            });
        };

        if mandate.is_sector_banned(sector) {
            return Ok(SectorCheck {
                can_add: false,
                reason: Some(format!("Sector '{sector}' is banned")),
                max_allowed_percent: None,
            });
        }
        Ok(SectorCheck {
            can_add: true,
            reason: None,
            max_allowed_percent: Some(mandate.max_sector_exposure_percent),
        })
    }
}

fn filter_by_mandate<'a>(
    candidates: &'a [CandidateSignal],
    mandate: &Mandate,
    min_quality_score: f64,
) -> Vec<&'a CandidateSignal> {
    candidates
        .iter()
        .filter(|signal| {
            signal.horizon_days >= mandate.horizon_min_days
                && signal.horizon_days <= mandate.horizon_max_days
        })
        .filter(|signal| !signal.quality_score.is_some_and(|q| q < min_quality_score))
        .filter(|signal| signal.regime_compatible != Some(false))
        .collect()
}

fn rank_by_objective(signals: &mut [&CandidateSignal], objective: Objective) {
    signals.sort_by(|a, b| {
        objective_score(b, objective)
            .partial_cmp(&objective_score(a, objective))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Missing edge/quality/confidence score as 0 / 0.5 / 0.5.
fn objective_score(signal: &CandidateSignal, objective: Objective) -> f64 {
    let edge = signal.edge.unwrap_or(0.0);
    let quality = signal.quality_score.unwrap_or(0.5);
    let confidence = signal.confidence.unwrap_or(0.5);
    match objective {
        Objective::MaxProfit => edge * quality,
        Objective::RiskMinimized => quality,
        Objective::Balanced => edge * quality * confidence,
    }
}

fn whole_units(value: Decimal) -> i64 {
    value.floor().to_i64().unwrap_or(0)
}
