//! Versioned account mandates.
//!
//! A mandate is the policy governing an account: objective, risk limits,
//! eligible horizons and sectors. Versions are append-only; exactly one
//! version is active per account at any time, and superseded versions are
//! retained for audit.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::providers::{MandateProvider, ProviderError};
use crate::types::AccountId;

/// Account objective driving signal ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    MaxProfit,
    RiskMinimized,
    Balanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mandate {
    pub account_id: AccountId,
    pub version: u32,
    pub objective: Objective,
    /// Maximum percentage of total capital at risk in a single trade.
    pub risk_per_trade_percent: Decimal,
    pub max_positions: u32,
    pub max_sector_exposure_percent: Decimal,
    pub horizon_min_days: i64,
    pub horizon_max_days: i64,
    pub banned_sectors: Vec<String>,
    pub earnings_blackout_days: i64,
    /// Stop distance as a multiple of ATR(14).
    pub sl_multiplier: Decimal,
    /// Target distance as a multiple of ATR(14).
    pub tp_multiplier: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Mandate {
    /// Creates a draft mandate with the account-service defaults.
    /// `version` and `is_active` are assigned when published into a [`MandateBook`].
    #[must_use]
    pub fn new(account_id: AccountId, objective: Objective) -> Self {
        Self {
            account_id,
            version: 0,
            objective,
            risk_per_trade_percent: Decimal::ONE,
            max_positions: 10,
            max_sector_exposure_percent: Decimal::from(30),
            horizon_min_days: 1,
            horizon_max_days: 30,
            banned_sectors: Vec::new(),
            earnings_blackout_days: 2,
            sl_multiplier: Decimal::from(2),
            tp_multiplier: Decimal::from(4),
            is_active: false,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive banned-sector test.
    #[must_use]
    pub fn is_sector_banned(&self, sector: &str) -> bool {
        self.banned_sectors
            .iter()
            .any(|banned| banned.eq_ignore_ascii_case(sector))
    }
}

/// Append-only store of mandate versions, one active version per account.
#[derive(Default)]
pub struct MandateBook {
    inner: RwLock<HashMap<AccountId, Vec<Mandate>>>,
}

impl MandateBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a new mandate version, atomically superseding the previous
    /// active version. The superseded version is retained, never deleted.
    pub async fn publish(&self, mut mandate: Mandate) -> Mandate {
        let mut inner = self.inner.write().await;
        let versions = inner.entry(mandate.account_id).or_default();

        if let Some(previous) = versions.iter_mut().find(|m| m.is_active) {
            previous.is_active = false;
        }

        mandate.version = versions.last().map_or(1, |m| m.version + 1);
        mandate.is_active = true;
        mandate.created_at = Utc::now();
        versions.push(mandate.clone());

        tracing::info!(
            account_id = mandate.account_id,
            version = mandate.version,
            objective = ?mandate.objective,
            "Published mandate"
        );
        mandate
    }

    /// The single active mandate for an account, if one has been published.
    pub async fn active(&self, account_id: AccountId) -> Option<Mandate> {
        self.inner
            .read()
            .await
            .get(&account_id)
            .and_then(|versions| versions.iter().find(|m| m.is_active).cloned())
    }

    /// All versions for an account, oldest first (audit trail).
    pub async fn history(&self, account_id: AccountId) -> Vec<Mandate> {
        self.inner
            .read()
            .await
            .get(&account_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MandateProvider for MandateBook {
    async fn active_mandate(&self, account_id: AccountId) -> Result<Option<Mandate>, ProviderError> {
        Ok(self.active(account_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_assigns_version_and_activates() {
        let book = MandateBook::new();
        let published = book.publish(Mandate::new(1, Objective::Balanced)).await;

        assert_eq!(published.version, 1);
        assert!(published.is_active);
        assert_eq!(book.active(1).await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn new_version_supersedes_old_atomically() {
        let book = MandateBook::new();
        book.publish(Mandate::new(1, Objective::Balanced)).await;
        book.publish(Mandate::new(1, Objective::MaxProfit)).await;

        let active = book.active(1).await.unwrap();
        assert_eq!(active.version, 2);
        assert_eq!(active.objective, Objective::MaxProfit);

        // Exactly one active version; the old one is retained for audit.
        let history = book.history(1).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|m| m.is_active).count(), 1);
        assert!(!history[0].is_active);
    }

    #[tokio::test]
    async fn accounts_are_independent() {
        let book = MandateBook::new();
        book.publish(Mandate::new(1, Objective::Balanced)).await;
        book.publish(Mandate::new(2, Objective::RiskMinimized)).await;

        assert_eq!(book.active(1).await.unwrap().objective, Objective::Balanced);
        assert_eq!(
            book.active(2).await.unwrap().objective,
            Objective::RiskMinimized
        );
        assert!(book.active(3).await.is_none());
    }

    #[test]
    fn banned_sector_match_is_case_insensitive() {
        let mut mandate = Mandate::new(1, Objective::Balanced);
        mandate.banned_sectors = vec!["Tobacco".to_string()];

        assert!(mandate.is_sector_banned("tobacco"));
        assert!(mandate.is_sector_banned("TOBACCO"));
        assert!(!mandate.is_sector_banned("Energy"));
    }
}
