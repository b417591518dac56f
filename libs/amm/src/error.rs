//! Error types for constant-product pool arithmetic
//!
//! Every engine function fails with exactly one of these kinds and never
//! returns a partial or clamped result.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result alias used across the engine
pub type AmmResult<T> = Result<T, AmmError>;

/// Failures raised by the AMM math engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// A divisor resolved to zero
    #[error("Division by zero")]
    DivisionByZero,

    /// A computed amount does not fit in a u64
    #[error("Overflow: result exceeds u64::MAX")]
    Overflow,

    /// An amount that must be strictly positive was zero
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// One or both pool reserves are zero
    #[error("Pool reserves are empty")]
    EmptyReserves,

    /// Fee rate above the permitted cap
    #[error("Invalid fee rate {fee_rate}: maximum is {max}")]
    InvalidFeeRate { fee_rate: u64, max: u64 },

    /// Requested output meets or exceeds what the pool can provide
    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    /// Optimal contribution exceeded the desired amount
    #[error("Optimal amount exceeds desired amount")]
    OverLimit,

    /// Constant product decreased across an operation
    #[error("Invariant violation: constant product decreased")]
    InvariantViolation,

    /// Slippage tolerance outside the open interval (0, 1)
    #[error("Invalid slippage tolerance: {0}")]
    InvalidSlippage(Decimal),

    /// Quote rejected because price impact exceeds the configured limit
    #[error("Price impact {impact_pct}% exceeds limit {max_pct}%")]
    PriceImpactTooHigh { impact_pct: Decimal, max_pct: Decimal },
}
