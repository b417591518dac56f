//! Constant-product pool math with u64 fixed-point semantics
//!
//! Reproduces the on-chain pool module bit for bit: every division floors,
//! every result is bounded to u64, and every precondition failure surfaces
//! as a typed [`AmmError`] instead of a clamped value.

use crate::constants::{FEE_SCALE, MAX_FEE_RATE, MINIMUM_LIQUIDITY_LOCK, TEAM_FEE_DIVISOR};
use crate::error::{AmmError, AmmResult};
use crate::full_math::{mul_div, mul_u128, narrow_u128, narrow_u256, sqrt_u128, U256};

/// Stateless namespace for constant-product pool calculations
pub struct CpmmMath;

impl CpmmMath {
    /// Amounts actually accepted when adding liquidity
    ///
    /// An empty pool takes the desired amounts as-is and the first deposit
    /// sets the price. Otherwise all of one side is used and only as much of
    /// the other as the current reserve ratio requires.
    ///
    /// # Returns
    /// `(x_optimal, y_optimal)`, each no greater than its desired amount
    pub fn calc_optimal_coin_values(
        x_desired: u64,
        y_desired: u64,
        x_reserve: u64,
        y_reserve: u64,
    ) -> AmmResult<(u64, u64)> {
        if x_reserve == 0 && y_reserve == 0 {
            return Ok((x_desired, y_desired));
        }

        let y_returned = mul_div(x_desired, y_reserve, x_reserve)?;
        if y_returned <= y_desired {
            return Ok((x_desired, y_returned));
        }

        let x_returned = mul_div(y_desired, x_reserve, y_reserve)?;
        if x_returned > x_desired {
            return Err(AmmError::OverLimit);
        }
        Ok((x_returned, y_desired))
    }

    /// LP shares minted for an optimal contribution
    ///
    /// The first deposit mints `floor(sqrt(x * y)) - MINIMUM_LIQUIDITY_LOCK`.
    /// Later deposits mint the smaller of the two proportional shares so a
    /// lopsided contribution is priced by its scarcer side.
    pub fn get_expected_liquidity_amount(
        x_optimal: u64,
        y_optimal: u64,
        x_reserve: u64,
        y_reserve: u64,
        lp_supply: u64,
    ) -> AmmResult<u64> {
        if x_reserve == 0 && y_reserve == 0 && lp_supply == 0 {
            let root = sqrt_u128(mul_u128(x_optimal, y_optimal));
            // Deposit too small to clear the permanent lock
            let minted = root
                .checked_sub(MINIMUM_LIQUIDITY_LOCK as u128)
                .ok_or(AmmError::InsufficientLiquidity)?;
            return narrow_u128(minted);
        }

        let x_liquidity = mul_div(lp_supply, x_optimal, x_reserve)?;
        let y_liquidity = mul_div(lp_supply, y_optimal, y_reserve)?;
        Ok(x_liquidity.min(y_liquidity))
    }

    /// Token amounts returned for burning `lp_amount` shares
    ///
    /// Both sides floor, so rounding dust stays with the remaining holders.
    pub fn get_expected_withdraw_amounts(
        lp_amount: u64,
        x_reserve: u64,
        y_reserve: u64,
        lp_supply: u64,
    ) -> AmmResult<(u64, u64)> {
        if lp_amount == 0 {
            return Err(AmmError::ZeroAmount);
        }
        if lp_supply == 0 {
            return Err(AmmError::DivisionByZero);
        }
        if lp_amount > lp_supply {
            return Err(AmmError::InsufficientLiquidity);
        }

        let x_out = mul_div(lp_amount, x_reserve, lp_supply)?;
        let y_out = mul_div(lp_amount, y_reserve, lp_supply)?;
        Ok((x_out, y_out))
    }

    /// Exact output for a given input using the x*y=k formula
    ///
    /// The fee is deducted from the input before the curve is applied:
    /// `out = in * (S - fee) * R_out / (R_in * S + in * (S - fee))`
    /// with `S = FEE_SCALE`.
    ///
    /// # Arguments
    /// * `fee_rate` - Fee scaled by `FEE_SCALE` (30 = 0.3%)
    /// * `amount_in` - Input token amount
    /// * `reserve_in` - Input token reserve
    /// * `reserve_out` - Output token reserve
    pub fn get_amount_out(
        fee_rate: u64,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> AmmResult<u64> {
        Self::validate_swap_inputs(fee_rate, amount_in, reserve_in, reserve_out)?;

        let fee_multiplier = FEE_SCALE - fee_rate;
        let amount_in_after_fee = mul_u128(amount_in, fee_multiplier);
        let new_reserve_in = mul_u128(reserve_in, FEE_SCALE) + amount_in_after_fee;

        let numerator = U256::from(amount_in_after_fee) * U256::from(reserve_out);
        narrow_u256(numerator / U256::from(new_reserve_in))
    }

    /// Required input for a desired output (reverse calculation)
    ///
    /// Adds 1 after the floor division so the trader never underpays
    /// relative to the exact-output curve.
    pub fn get_amount_in(
        fee_rate: u64,
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> AmmResult<u64> {
        Self::validate_swap_inputs(fee_rate, amount_out, reserve_in, reserve_out)?;
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        let fee_multiplier = FEE_SCALE - fee_rate;
        let numerator = U256::from(mul_u128(reserve_in, amount_out)) * U256::from(FEE_SCALE);
        let denominator = U256::from(mul_u128(reserve_out - amount_out, fee_multiplier));

        narrow_u256(numerator / denominator + U256::one())
    }

    /// Protocol team's cut of the fee charged on `coin_in`
    ///
    /// The remaining four fifths accrue to LPs through reserve growth.
    pub fn get_fee_to_team(fee_rate: u64, coin_in: u64) -> AmmResult<u64> {
        let total_fee = mul_div(coin_in, fee_rate, FEE_SCALE)?;
        Ok(total_fee / TEAM_FEE_DIVISOR)
    }

    /// Fail unless the constant product did not decrease
    ///
    /// Run this on the projected reserves of every swap, deposit and
    /// withdrawal regardless of which formula produced them.
    pub fn assert_lp_value_is_increased(
        old_reserve_x: u64,
        old_reserve_y: u64,
        new_reserve_x: u64,
        new_reserve_y: u64,
    ) -> AmmResult<()> {
        let old_k = mul_u128(old_reserve_x, old_reserve_y);
        let new_k = mul_u128(new_reserve_x, new_reserve_y);
        if old_k > new_k {
            return Err(AmmError::InvariantViolation);
        }
        Ok(())
    }

    fn validate_swap_inputs(
        fee_rate: u64,
        amount: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> AmmResult<()> {
        if fee_rate > MAX_FEE_RATE {
            return Err(AmmError::InvalidFeeRate {
                fee_rate,
                max: MAX_FEE_RATE,
            });
        }
        if amount == 0 {
            return Err(AmmError::ZeroAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::EmptyReserves);
        }
        Ok(())
    }
}
