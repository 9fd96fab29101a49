//! Shared domain types consumed across the desk.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier assigned at onboarding.
pub type AccountId = i64;

/// Lifecycle status of a trading account. Mutated by the account service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Paused,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub fn new(id: AccountId, owner: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

/// Evaluation scope: a single account or the whole portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Portfolio,
    Account(AccountId),
}

impl Scope {
    /// The account id this scope narrows to, if any.
    #[must_use]
    pub const fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Portfolio => None,
            Self::Account(id) => Some(*id),
        }
    }
}

/// Candidate trade signal produced upstream; consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub id: i64,
    pub symbol: String,
    pub exchange: String,
    pub direction: Direction,
    pub edge: Option<f64>,
    pub confidence: Option<f64>,
    pub quality_score: Option<f64>,
    pub horizon_days: i64,
    pub regime_compatible: Option<bool>,
}

/// Latest per-symbol feature snapshot from the feature builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub symbol: String,
    pub atr_14d: Option<Decimal>,
    pub regime_label: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// An entry from the earnings/corporate-action calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub symbol: String,
    pub event_type: String,
    pub event_date: NaiveDate,
}

/// A generic ingested event (news, filing, catalyst).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub symbols: Vec<String>,
    pub event_timestamp: Option<DateTime<Utc>>,
    pub ingested_at: Option<DateTime<Utc>>,
}

impl EventRecord {
    /// Best-known reference timestamp: the event time, falling back to ingestion time.
    #[must_use]
    pub fn reference_timestamp(&self) -> Option<DateTime<Utc>> {
        self.event_timestamp.or(self.ingested_at)
    }
}

/// An open position as reported by the position service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPosition {
    pub account_id: AccountId,
    pub symbol: String,
    pub sector: Option<String>,
    pub quantity: i64,
    pub average_entry_price: Decimal,
    pub current_price: Option<Decimal>,
    pub risk_amount: Decimal,
    pub unrealized_pnl: Decimal,
}

impl OpenPosition {
    /// Market value at the current price, falling back to the entry price.
    #[must_use]
    pub fn market_value(&self) -> Decimal {
        let price = self.current_price.unwrap_or(self.average_entry_price);
        price * Decimal::from(self.quantity)
    }
}

/// A position closed today, carrying its realized P&L.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub account_id: AccountId,
    pub symbol: String,
    pub realized_pnl: Decimal,
    pub closed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(current: Option<Decimal>) -> OpenPosition {
        OpenPosition {
            account_id: 1,
            symbol: "RELIANCE".to_string(),
            sector: Some("Energy".to_string()),
            quantity: 10,
            average_entry_price: dec!(2500),
            current_price: current,
            risk_amount: dec!(500),
            unrealized_pnl: dec!(0),
        }
    }

    #[test]
    fn market_value_uses_current_price_when_present() {
        let pos = position(Some(dec!(2600)));
        assert_eq!(pos.market_value(), dec!(26000));
    }

    #[test]
    fn market_value_falls_back_to_entry_price() {
        let pos = position(None);
        assert_eq!(pos.market_value(), dec!(25000));
    }

    #[test]
    fn scope_account_id() {
        assert_eq!(Scope::Portfolio.account_id(), None);
        assert_eq!(Scope::Account(7).account_id(), Some(7));
    }

    #[test]
    fn event_reference_timestamp_prefers_event_time() {
        let event_ts = Utc::now();
        let ingested = event_ts - chrono::Duration::hours(1);
        let record = EventRecord {
            id: 1,
            symbols: vec!["TCS".to_string()],
            event_timestamp: Some(event_ts),
            ingested_at: Some(ingested),
        };
        assert_eq!(record.reference_timestamp(), Some(event_ts));

        let record = EventRecord {
            event_timestamp: None,
            ..record
        };
        assert_eq!(record.reference_timestamp(), Some(ingested));
    }
}
