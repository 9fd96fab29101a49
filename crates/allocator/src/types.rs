//! Allocator outputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trade_desk_core::Direction;

/// A candidate signal sized for one account, ready for guardrail review.
/// Ephemeral until it survives the guardrails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizedOpportunity {
    pub signal_id: i64,
    pub symbol: String,
    pub exchange: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub quantity: i64,
    pub position_value: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub risk_amount: Decimal,
    pub reward_amount: Decimal,
    pub risk_reward_ratio: Decimal,
    pub edge: Option<f64>,
    pub confidence: Option<f64>,
    pub horizon_days: i64,
}

/// Whether an account has room for another position under its mandate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionLimits {
    pub can_add: bool,
    pub current_positions: usize,
    pub max_positions: u32,
    pub available_slots: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Fast banned-sector screen. The numeric exposure check lives in the
/// guardrails, which see the concrete new-position value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorCheck {
    pub can_add: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_percent: Option<Decimal>,
}
