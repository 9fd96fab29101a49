//! The allocator: candidate signals in, capital-sized opportunities out.
//!
//! For each account the pool of candidate signals is filtered against the
//! active mandate, ranked by the mandate's objective, and the top candidates
//! are sized from volatility and the capital ledger. A paused account (kill
//! switch) produces nothing.

pub mod allocator;
pub mod types;

pub use allocator::Allocator;
pub use types::{PositionLimits, SectorCheck, SizedOpportunity};
