//! Slippage bounds and price impact
//!
//! Engine outputs are exact for the reserve snapshot they were computed on.
//! Reserves can move before the transaction lands, so callers widen each
//! amount by a tolerance before embedding it in a transaction.

use crate::cpmm_math::CpmmMath;
use crate::error::{AmmError, AmmResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tolerance-adjusted bounds for transaction arguments
pub struct SlippageMath;

impl SlippageMath {
    /// Minimum acceptable amount: `floor(amount * (1 - slippage))`
    pub fn min_amount_out(amount: u64, slippage: Decimal) -> AmmResult<u64> {
        let keep = Self::retained_fraction(slippage)?;
        let bound = Decimal::from(amount)
            .checked_mul(keep)
            .ok_or(AmmError::Overflow)?
            .floor();
        bound.to_u64().ok_or(AmmError::Overflow)
    }

    /// Maximum acceptable amount: `ceil(amount / (1 - slippage))`
    pub fn max_amount_in(amount: u64, slippage: Decimal) -> AmmResult<u64> {
        let keep = Self::retained_fraction(slippage)?;
        let bound = Decimal::from(amount)
            .checked_div(keep)
            .ok_or(AmmError::Overflow)?
            .ceil();
        bound.to_u64().ok_or(AmmError::Overflow)
    }

    /// Price impact of a swap as a percentage of the spot price
    ///
    /// Compares the pre-trade spot price `reserve_out / reserve_in` with the
    /// realized rate `amount_out / amount_in`, fee included.
    pub fn price_impact_pct(
        fee_rate: u64,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> AmmResult<Decimal> {
        let amount_out = CpmmMath::get_amount_out(fee_rate, amount_in, reserve_in, reserve_out)?;

        let spot = Decimal::from(reserve_out)
            .checked_div(Decimal::from(reserve_in))
            .ok_or(AmmError::Overflow)?;
        let execution = Decimal::from(amount_out)
            .checked_div(Decimal::from(amount_in))
            .ok_or(AmmError::Overflow)?;

        if spot.is_zero() {
            return Ok(dec!(0));
        }
        let impact = (spot - execution) / spot * dec!(100);
        Ok(impact.max(dec!(0)))
    }

    /// `1 - slippage`, rejecting tolerances outside (0, 1)
    fn retained_fraction(slippage: Decimal) -> AmmResult<Decimal> {
        if slippage <= dec!(0) || slippage >= dec!(1) {
            return Err(AmmError::InvalidSlippage(slippage));
        }
        Ok(dec!(1) - slippage)
    }
}
