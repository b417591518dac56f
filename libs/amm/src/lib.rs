//! # CPMM AMM - Constant-Product Pool Arithmetic
//!
//! ## Purpose
//!
//! Deterministic integer math for a two-asset constant-product pool: swap
//! outputs and inputs, optimal deposit amounts, minted and burned LP shares,
//! and the protocol fee split. Results match the on-chain pool module's u64
//! arithmetic exactly so quotes computed off-chain never disagree with the
//! contract that executes them.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Reserve, LP supply and fee snapshots read from chain
//!   by the caller immediately before quoting
//! - **Output Destinations**: Transaction builders, which embed the
//!   slippage-adjusted bounds as call arguments
//! - **Precision**: u128 / U256 intermediates, narrowed to u64 only after the
//!   final division
//! - **Validation**: Every function fails with a typed [`AmmError`] instead
//!   of clamping
//!
//! ## Architecture Role
//!
//! ```text
//! PoolSnapshot ──► CpmmMath (exact amounts) ──► assert_lp_value_is_increased
//!                                                      │
//!                              QuoteConfig ──► SlippageMath (bounds) ──► caller
//! ```
//!
//! All functions are pure and reentrant. There is no shared state, so the
//! engine can be called from any number of threads without synchronization.
//! Staleness is the caller's problem: re-fetch reserves before every quote.
//!
//! ## Example
//!
//! ```rust
//! use cpmm_amm::{CpmmMath, PoolSnapshot, QuoteConfig, SwapDirection};
//!
//! let out = CpmmMath::get_amount_out(30, 1000, 1_000_000, 2_000_000).unwrap();
//! assert_eq!(out, 1992);
//!
//! let pool = PoolSnapshot::new(1_000_000, 2_000_000, 1_414_213, 30);
//! let quote = pool
//!     .quote_swap_exact_in(SwapDirection::XToY, 1000, &QuoteConfig::default())
//!     .unwrap();
//! assert!(quote.limit_amount <= quote.amount_out);
//! ```

pub mod config;
pub mod constants;
pub mod cpmm_math;
pub mod error;
pub mod full_math;
pub mod pool_traits;
pub mod slippage;

pub use config::QuoteConfig;
pub use constants::{FEE_SCALE, MAX_FEE_RATE, MINIMUM_LIQUIDITY_LOCK, TEAM_FEE_DIVISOR, U64_MAX};
pub use cpmm_math::CpmmMath;
pub use error::{AmmError, AmmResult};
pub use full_math::mul_div;
pub use pool_traits::{
    AmmPool, LiquidityQuote, PoolSnapshot, SwapDirection, SwapQuote, WithdrawQuote,
};
pub use slippage::SlippageMath;

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
