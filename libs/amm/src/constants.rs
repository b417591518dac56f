//! Fixed engine parameters
//!
//! These mirror the on-chain pool module and must never drift from it.

/// Denominator for fee rates (a rate of 30 means 0.3%)
pub const FEE_SCALE: u64 = 10_000;

/// Highest accepted fee rate, 20% of the input
pub const MAX_FEE_RATE: u64 = 2_000;

/// Largest amount representable by the target VM
pub const U64_MAX: u64 = u64::MAX;

/// LP shares burned forever on the first deposit
pub const MINIMUM_LIQUIDITY_LOCK: u64 = 1_000;

/// Share of the collected fee routed to the protocol team (1/5)
pub const TEAM_FEE_DIVISOR: u64 = 5;
