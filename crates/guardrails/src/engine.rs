//! The six-check engine.
//!
//! Every check is bulkheaded: a provider failure inside one check degrades
//! that check to a fail-open warning and never touches the others. The
//! engine itself is infallible: callers always receive a full verdict.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use trade_desk_core::{
    AccountId, EventCalendar, FeatureProvider, GuardrailConfig, MandateProvider,
    MarketDataProvider, PositionProvider, Scope,
};
use trade_desk_treasury::Treasury;

use crate::metrics::record_verdict;
use crate::verdict::{codes, GuardrailVerdict, RiskWarning, Severity, TradeCheck};

pub struct GuardrailEngine {
    config: GuardrailConfig,
    treasury: Arc<Treasury>,
    market_data: Arc<dyn MarketDataProvider>,
    features: Arc<dyn FeatureProvider>,
    calendar: Arc<dyn EventCalendar>,
    positions: Arc<dyn PositionProvider>,
    mandates: Arc<dyn MandateProvider>,
}

impl GuardrailEngine {
    pub fn new(
        config: GuardrailConfig,
        treasury: Arc<Treasury>,
        market_data: Arc<dyn MarketDataProvider>,
        features: Arc<dyn FeatureProvider>,
        calendar: Arc<dyn EventCalendar>,
        positions: Arc<dyn PositionProvider>,
        mandates: Arc<dyn MandateProvider>,
    ) -> Self {
        Self {
            config,
            treasury,
            market_data,
            features,
            calendar,
            positions,
            mandates,
        }
    }

    /// Runs all six checks and aggregates the verdict. Blocks when any
    /// check fails or any critical warning is raised.
    pub async fn run_all_checks(&self, check: &TradeCheck) -> GuardrailVerdict {
        let started = Instant::now();
        let mut warnings = Vec::new();

        let liquidity_check = self.check_liquidity(check, &mut warnings).await;
        let position_size_check = self.check_position_size(check, &mut warnings).await;
        let exposure_check = self.check_sector_exposure(check, &mut warnings).await;
        let event_window_check = self.check_event_window(check, &mut warnings).await;
        let regime_check = self.check_regime(check, &mut warnings).await;
        let catalyst_freshness_check = self.check_catalyst_freshness(check, &mut warnings).await;

        let has_critical_failures = warnings.iter().any(|w| w.severity == Severity::Critical);
        let passed_all = liquidity_check
            && position_size_check
            && exposure_check
            && event_window_check
            && regime_check
            && catalyst_freshness_check
            && !has_critical_failures;

        let verdict = GuardrailVerdict {
            liquidity_check,
            position_size_check,
            exposure_check,
            event_window_check,
            regime_check,
            catalyst_freshness_check,
            risk_warnings: warnings,
            passed_all,
            has_critical_failures,
            timestamp: Utc::now(),
            account_id: check.account_id,
            symbol: check.symbol.clone(),
            evaluation_duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        };

        record_verdict(&verdict);
        if !verdict.passed_all {
            tracing::warn!(
                symbol = %verdict.symbol,
                account_id = ?verdict.account_id,
                reason = ?verdict.first_critical_code(),
                "Trade blocked by guardrails"
            );
        }
        verdict
    }

    /// Trade size must stay within a fraction of average daily volume.
    async fn check_liquidity(&self, check: &TradeCheck, warnings: &mut Vec<RiskWarning>) -> bool {
        let volumes = match self
            .market_data
            .recent_volumes(&check.symbol, self.config.adv_lookback_sessions)
            .await
        {
            Ok(volumes) => volumes,
            Err(err) => {
                tracing::error!(symbol = %check.symbol, error = %err, "Liquidity check error");
                warnings.push(RiskWarning::warning(
                    codes::LIQUIDITY_CHECK_ERROR,
                    "Liquidity check error",
                ));
                return true;
            }
        };

        let total: Decimal = volumes.iter().sum();
        if volumes.is_empty() || total <= Decimal::ZERO {
            warnings.push(
                RiskWarning::warning(
                    codes::INSUFFICIENT_VOLUME_DATA,
                    format!("Insufficient volume history for {}", check.symbol),
                )
                .with_details(json!({
                    "lookback_sessions": self.config.adv_lookback_sessions,
                })),
            );
            return true;
        }

        let avg_volume = total / Decimal::from(volumes.len() as u64);
        let ratio = Decimal::from(check.quantity) / avg_volume;
        if ratio > self.config.max_trade_to_adv_ratio {
            warnings.push(
                RiskWarning::critical(
                    codes::LIQUIDITY_BELOW_THRESHOLD,
                    format!(
                        "Trade size exceeds {}% of ADV",
                        self.config.max_trade_to_adv_ratio * Decimal::from(100)
                    ),
                )
                .with_details(json!({ "ratio": ratio, "adv": avg_volume })),
            );
            return false;
        }
        true
    }

    /// Per-trade risk must stay within the mandate's risk budget.
    async fn check_position_size(
        &self,
        check: &TradeCheck,
        warnings: &mut Vec<RiskWarning>,
    ) -> bool {
        let Some(account_id) = check.account_id else {
            return true;
        };
        let mandate = match self.mandates.active_mandate(account_id).await {
            Ok(Some(mandate)) => mandate,
            Ok(None) => return true,
            Err(err) => {
                tracing::error!(account_id, error = %err, "Position size check error");
                warnings.push(RiskWarning::warning(
                    codes::POSITION_SIZE_CHECK_ERROR,
                    "Position size check error",
                ));
                return true;
            }
        };
        if mandate.risk_per_trade_percent <= Decimal::ZERO {
            return true;
        }

        let total_capital = self.total_capital(account_id).await;
        let risk_per_share = (check.entry_price - check.stop_loss).abs();
        let total_risk = risk_per_share * Decimal::from(check.quantity);
        let risk_percent = total_risk / total_capital * Decimal::from(100);

        if risk_percent > mandate.risk_per_trade_percent {
            warnings.push(
                RiskWarning::critical(
                    codes::POSITION_SIZE_EXCEEDED,
                    "Risk per trade exceeds mandate limit",
                )
                .with_details(json!({
                    "risk_percent": risk_percent,
                    "limit": mandate.risk_per_trade_percent,
                    "total_risk": total_risk,
                    "capital": total_capital,
                })),
            );
            return false;
        }
        true
    }

    /// Banned sectors block outright; otherwise sector exposure including
    /// the new position must stay under the mandate cap.
    async fn check_sector_exposure(
        &self,
        check: &TradeCheck,
        warnings: &mut Vec<RiskWarning>,
    ) -> bool {
        let Some(account_id) = check.account_id else {
            return true;
        };
        let mandate = match self.mandates.active_mandate(account_id).await {
            Ok(Some(mandate)) => mandate,
            Ok(None) => return true,
            Err(err) => {
                tracing::error!(account_id, error = %err, "Sector exposure check error");
                warnings.push(RiskWarning::warning(
                    codes::SECTOR_CHECK_ERROR,
                    "Sector exposure check error",
                ));
                return true;
            }
        };

        let Some(sector) = check
            .sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            warnings.push(RiskWarning::info(
                codes::SECTOR_UNKNOWN,
                "Sector not provided; exposure check may be imprecise",
            ));
            return true;
        };

        if mandate.is_sector_banned(sector) {
            warnings.push(
                RiskWarning::critical(codes::SECTOR_BANNED, "Sector is banned by mandate")
                    .with_details(json!({ "sector": sector })),
            );
            return false;
        }

        let open_positions = match self.positions.open_positions(Scope::Account(account_id)).await
        {
            Ok(positions) => positions,
            Err(err) => {
                tracing::error!(account_id, error = %err, "Sector exposure check error");
                warnings.push(RiskWarning::warning(
                    codes::SECTOR_CHECK_ERROR,
                    "Sector exposure check error",
                ));
                return true;
            }
        };

        let sector_value: Decimal = open_positions
            .iter()
            .filter(|p| {
                p.sector
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(sector))
            })
            .map(|p| p.market_value())
            .sum();
        let new_position_value = check.entry_price * Decimal::from(check.quantity);
        let total_capital = self.total_capital(account_id).await;
        let exposure_percent =
            (sector_value + new_position_value) / total_capital * Decimal::from(100);

        let limit = if mandate.max_sector_exposure_percent > Decimal::ZERO {
            mandate.max_sector_exposure_percent
        } else {
            self.config.default_sector_exposure_max
        };
        if exposure_percent > limit {
            warnings.push(
                RiskWarning::critical(
                    codes::SECTOR_EXPOSURE_EXCEEDED,
                    "Sector exposure exceeds limit",
                )
                .with_details(json!({
                    "exposure_percent": exposure_percent,
                    "limit_percent": limit,
                })),
            );
            return false;
        }
        true
    }

    /// No trading inside the earnings blackout window. A detected event
    /// blocks at WARNING severity; the dedicated calendar is preferred,
    /// falling back to the generic event log.
    async fn check_event_window(
        &self,
        check: &TradeCheck,
        warnings: &mut Vec<RiskWarning>,
    ) -> bool {
        let mut blackout_days = self.config.default_event_blackout_days;
        if let Some(account_id) = check.account_id {
            if let Ok(Some(mandate)) = self.mandates.active_mandate(account_id).await {
                if mandate.earnings_blackout_days > 0 {
                    blackout_days = mandate.earnings_blackout_days;
                }
            }
        }

        let now = Utc::now();
        let window = chrono::Duration::days(blackout_days);
        let (start, end) = (now - window, now + window);

        match self
            .calendar
            .earnings_between(&check.symbol, start.date_naive(), end.date_naive())
            .await
        {
            Ok(Some(event)) => {
                warnings.push(
                    RiskWarning::warning(
                        codes::EVENT_WINDOW_WARNING,
                        format!("Upcoming {} on {}", event.event_type, event.event_date),
                    )
                    .with_details(json!({ "event_date": event.event_date.to_string() })),
                );
                return false;
            }
            Ok(None) => {}
            Err(err) => {
                // Calendar source may be missing; the generic log still covers us.
                tracing::warn!(symbol = %check.symbol, error = %err, "Earnings calendar unavailable");
            }
        }

        match self.calendar.events_between(&check.symbol, start, end).await {
            Ok(Some(_)) => {
                warnings.push(RiskWarning::warning(
                    codes::EVENT_WINDOW_WARNING,
                    "Event within blackout window",
                ));
                false
            }
            Ok(None) => true,
            Err(err) => {
                tracing::error!(symbol = %check.symbol, error = %err, "Event window check error");
                warnings.push(RiskWarning::warning(
                    codes::EVENT_WINDOW_CHECK_ERROR,
                    "Event window check error",
                ));
                true
            }
        }
    }

    /// Advisory only: never fails, annotates when no regime label exists.
    async fn check_regime(&self, check: &TradeCheck, warnings: &mut Vec<RiskWarning>) -> bool {
        match self.features.latest_features(&check.symbol).await {
            Ok(Some(features)) if features.regime_label.is_some() => {}
            Ok(_) => {
                warnings.push(RiskWarning::info(
                    codes::REGIME_UNKNOWN,
                    "No regime label available",
                ));
            }
            Err(err) => {
                tracing::error!(symbol = %check.symbol, error = %err, "Regime check error");
                warnings.push(RiskWarning::warning(
                    codes::REGIME_CHECK_ERROR,
                    "Regime check error",
                ));
            }
        }
        true
    }

    /// Hot-path only: a supplied catalyst must be younger than the
    /// freshness horizon.
    async fn check_catalyst_freshness(
        &self,
        check: &TradeCheck,
        warnings: &mut Vec<RiskWarning>,
    ) -> bool {
        let Some(event_id) = check.event_id else {
            return true;
        };
        let event = match self.calendar.event_by_id(event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => return true,
            Err(err) => {
                tracing::error!(event_id, error = %err, "Catalyst freshness check error");
                warnings.push(RiskWarning::warning(
                    codes::CATALYST_CHECK_ERROR,
                    "Catalyst freshness check error",
                ));
                return true;
            }
        };
        let Some(reference) = event.reference_timestamp() else {
            return true;
        };

        let age_hours = (Utc::now() - reference).num_seconds() as f64 / 3600.0;
        if age_hours > self.config.catalyst_freshness_hours as f64 {
            warnings.push(
                RiskWarning::critical(codes::CATALYST_STALE, "Event catalyst is stale")
                    .with_details(json!({
                        "age_hours": (age_hours * 10.0).round() / 10.0,
                        "threshold_hours": self.config.catalyst_freshness_hours,
                    })),
            );
            return false;
        }
        true
    }

    /// Ledger capital for the account, or the configured fallback when the
    /// ledger has nothing usable.
    async fn total_capital(&self, account_id: AccountId) -> Decimal {
        match self.treasury.total_capital(account_id).await {
            Some(total) if total > Decimal::ZERO => total,
            _ => self.config.fallback_total_capital,
        }
    }
}
