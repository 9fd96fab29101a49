//! Kill switches: threshold-triggered trading pauses.
//!
//! Each switch is a small state machine: INACTIVE until its metric breaches
//! the threshold, TRIGGERED until a manual reset or its auto-reset window
//! elapses. Triggered switches with `pause_new_entries` gate the allocator.

pub mod monitor;
pub mod switch;

pub use monitor::KillSwitchMonitor;
pub use switch::{
    KillSwitch, RiskMetrics, RiskSnapshot, SwitchType, ThresholdType, TriggerAction,
    TriggeredSwitch,
};
