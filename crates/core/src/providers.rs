//! Trait seams for external collaborators.
//!
//! The decision core never reaches into market-data, feature, calendar, or
//! position services directly; it consumes these traits. Production wiring
//! injects the real clients, tests inject in-memory stubs.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::mandate::Mandate;
use crate::types::{
    AccountId, CalendarEvent, ClosedPosition, EventRecord, FeatureSnapshot, OpenPosition, Scope,
};

/// Failure reaching or querying an external dependency.
///
/// `Unavailable` is the hard failure class: the dependency could not be
/// reached at all. Callers degrade per the failure policy (skip the symbol,
/// fail the affected check open) rather than aborting the batch.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("dependency unavailable: {0}")]
    Unavailable(String),

    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl ProviderError {
    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::Unavailable(what.into())
    }

    pub fn lookup(what: impl Into<String>) -> Self {
        Self::Lookup(what.into())
    }
}

/// Latest prices and traded volumes from the market-data cache.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest known close for a symbol, `None` if never seen.
    async fn latest_close(
        &self,
        symbol: &str,
        exchange: &str,
    ) -> Result<Option<Decimal>, ProviderError>;

    /// Traded volume for the most recent sessions, newest first.
    /// May return fewer sessions than requested, or none at all.
    async fn recent_volumes(
        &self,
        symbol: &str,
        lookback_sessions: u32,
    ) -> Result<Vec<Decimal>, ProviderError>;
}

/// Latest computed feature snapshot (ATR, regime label) per symbol.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    async fn latest_features(&self, symbol: &str) -> Result<Option<FeatureSnapshot>, ProviderError>;
}

/// Earnings calendar and generic ingested-event lookups.
#[async_trait]
pub trait EventCalendar: Send + Sync {
    /// First earnings/corporate-action entry for the symbol inside the window.
    async fn earnings_between(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<CalendarEvent>, ProviderError>;

    /// First generic event mentioning the symbol inside the window
    /// (fallback when no dedicated calendar entry exists).
    async fn events_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<EventRecord>, ProviderError>;

    async fn event_by_id(&self, event_id: i64) -> Result<Option<EventRecord>, ProviderError>;
}

/// Open and recently closed positions from the position service.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn open_positions(&self, scope: Scope) -> Result<Vec<OpenPosition>, ProviderError>;

    /// Positions closed at or after `since`, within the scope.
    async fn closed_since(
        &self,
        scope: Scope,
        since: DateTime<Utc>,
    ) -> Result<Vec<ClosedPosition>, ProviderError>;
}

/// Active-mandate lookup from the account-management service.
#[async_trait]
pub trait MandateProvider: Send + Sync {
    async fn active_mandate(&self, account_id: AccountId)
        -> Result<Option<Mandate>, ProviderError>;
}
