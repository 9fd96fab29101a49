//! Pre-trade guardrails.
//!
//! Six independent checks run against every candidate trade: liquidity,
//! position-size risk, sector exposure, event window, regime compatibility,
//! and catalyst freshness. Each check passes or fails on its own and may
//! attach a warning; checks are bulkheaded so a failure inside one never
//! aborts the rest. The engine always returns a structured verdict.

pub mod engine;
pub mod metrics;
pub mod verdict;

pub use engine::GuardrailEngine;
pub use verdict::{codes, GuardrailVerdict, RiskSummary, RiskWarning, Severity, TradeCheck};
