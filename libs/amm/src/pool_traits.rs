//! Pool snapshot and quoting interface
//!
//! Chains the engine the way a transaction builder does: read reserves,
//! compute the exact amount, project post-trade reserves, verify the
//! constant product, then widen by the configured slippage.

use crate::config::QuoteConfig;
use crate::cpmm_math::CpmmMath;
use crate::error::{AmmError, AmmResult};
use crate::full_math::mul_div;
use crate::slippage::SlippageMath;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which reserve receives the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    XToY,
    YToX,
}

/// Unified pool interface for quoting
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, direction: SwapDirection, amount_in: u64) -> AmmResult<u64>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, direction: SwapDirection, amount_out: u64) -> AmmResult<u64>;

    /// Get current reserves as (x, y)
    fn get_reserves(&self) -> (u64, u64);

    /// Get fee rate scaled by `FEE_SCALE`
    fn get_fee_rate(&self) -> u64;
}

/// Pool state read from chain immediately before quoting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub reserve_x: u64,
    pub reserve_y: u64,
    pub lp_supply: u64,
    pub fee_rate: u64, // 30 = 0.3%
}

/// Swap quote with its slippage-adjusted bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub amount_out: u64,
    /// Minimum output for exact-in swaps, maximum input for exact-out swaps
    pub limit_amount: u64,
    pub protocol_fee: u64,
    pub price_impact_pct: Decimal,
}

/// Deposit quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityQuote {
    pub amount_x: u64,
    pub amount_y: u64,
    pub lp_minted: u64,
    pub min_lp_minted: u64,
}

/// Withdrawal quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawQuote {
    pub lp_burned: u64,
    pub amount_x: u64,
    pub amount_y: u64,
    pub min_amount_x: u64,
    pub min_amount_y: u64,
}

impl PoolSnapshot {
    pub fn new(reserve_x: u64, reserve_y: u64, lp_supply: u64, fee_rate: u64) -> Self {
        Self {
            reserve_x,
            reserve_y,
            lp_supply,
            fee_rate,
        }
    }

    /// Reserves ordered as (input side, output side)
    fn oriented_reserves(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::XToY => (self.reserve_x, self.reserve_y),
            SwapDirection::YToX => (self.reserve_y, self.reserve_x),
        }
    }

    /// Post-swap reserves as (x, y)
    ///
    /// The team fee leaves the pool, so only `amount_in - protocol_fee`
    /// lands in the input reserve.
    fn reserves_after_swap(
        &self,
        direction: SwapDirection,
        amount_in: u64,
        amount_out: u64,
        protocol_fee: u64,
    ) -> AmmResult<(u64, u64)> {
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);
        let new_in = reserve_in
            .checked_add(amount_in - protocol_fee)
            .ok_or(AmmError::Overflow)?;
        let new_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(AmmError::InsufficientLiquidity)?;

        Ok(match direction {
            SwapDirection::XToY => (new_in, new_out),
            SwapDirection::YToX => (new_out, new_in),
        })
    }

    fn check_invariant(&self, new_x: u64, new_y: u64) -> AmmResult<()> {
        CpmmMath::assert_lp_value_is_increased(self.reserve_x, self.reserve_y, new_x, new_y)
            .inspect_err(|_| {
                warn!(
                    old_x = self.reserve_x,
                    old_y = self.reserve_y,
                    new_x,
                    new_y,
                    "Constant product decreased"
                );
            })
    }

    /// Quote a swap with a fixed input amount
    pub fn quote_swap_exact_in(
        &self,
        direction: SwapDirection,
        amount_in: u64,
        config: &QuoteConfig,
    ) -> AmmResult<SwapQuote> {
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);
        let amount_out = self.get_amount_out(direction, amount_in).inspect_err(|e| {
            debug!(?direction, amount_in, error = %e, "Exact-in quote rejected");
        })?;
        let protocol_fee = CpmmMath::get_fee_to_team(self.fee_rate, amount_in)?;

        let (new_x, new_y) = self.reserves_after_swap(direction, amount_in, amount_out, protocol_fee)?;
        self.check_invariant(new_x, new_y)?;

        let price_impact_pct =
            SlippageMath::price_impact_pct(self.fee_rate, amount_in, reserve_in, reserve_out)?;
        if let Some(max_pct) = config.max_price_impact_pct {
            if price_impact_pct > max_pct {
                return Err(AmmError::PriceImpactTooHigh {
                    impact_pct: price_impact_pct,
                    max_pct,
                });
            }
        }

        Ok(SwapQuote {
            direction,
            amount_in,
            amount_out,
            limit_amount: SlippageMath::min_amount_out(amount_out, config.slippage_tolerance)?,
            protocol_fee,
            price_impact_pct,
        })
    }

    /// Quote a swap with a fixed output amount
    pub fn quote_swap_exact_out(
        &self,
        direction: SwapDirection,
        amount_out: u64,
        config: &QuoteConfig,
    ) -> AmmResult<SwapQuote> {
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);
        let amount_in = self.get_amount_in(direction, amount_out).inspect_err(|e| {
            debug!(?direction, amount_out, error = %e, "Exact-out quote rejected");
        })?;
        let protocol_fee = CpmmMath::get_fee_to_team(self.fee_rate, amount_in)?;

        let (new_x, new_y) = self.reserves_after_swap(direction, amount_in, amount_out, protocol_fee)?;
        self.check_invariant(new_x, new_y)?;

        let price_impact_pct =
            SlippageMath::price_impact_pct(self.fee_rate, amount_in, reserve_in, reserve_out)?;
        if let Some(max_pct) = config.max_price_impact_pct {
            if price_impact_pct > max_pct {
                return Err(AmmError::PriceImpactTooHigh {
                    impact_pct: price_impact_pct,
                    max_pct,
                });
            }
        }

        Ok(SwapQuote {
            direction,
            amount_in,
            amount_out,
            limit_amount: SlippageMath::max_amount_in(amount_in, config.slippage_tolerance)?,
            protocol_fee,
            price_impact_pct,
        })
    }

    /// Quote a deposit of up to the desired amounts
    pub fn quote_add_liquidity(
        &self,
        x_desired: u64,
        y_desired: u64,
        config: &QuoteConfig,
    ) -> AmmResult<LiquidityQuote> {
        if x_desired == 0 || y_desired == 0 {
            return Err(AmmError::ZeroAmount);
        }

        let (amount_x, amount_y) =
            CpmmMath::calc_optimal_coin_values(x_desired, y_desired, self.reserve_x, self.reserve_y)?;
        let lp_minted = CpmmMath::get_expected_liquidity_amount(
            amount_x,
            amount_y,
            self.reserve_x,
            self.reserve_y,
            self.lp_supply,
        )?;

        let new_x = self.reserve_x.checked_add(amount_x).ok_or(AmmError::Overflow)?;
        let new_y = self.reserve_y.checked_add(amount_y).ok_or(AmmError::Overflow)?;
        self.check_invariant(new_x, new_y)?;

        debug!(amount_x, amount_y, lp_minted, "Deposit quoted");

        Ok(LiquidityQuote {
            amount_x,
            amount_y,
            lp_minted,
            min_lp_minted: SlippageMath::min_amount_out(lp_minted, config.slippage_tolerance)?,
        })
    }

    /// Quote burning `lp_amount` shares
    ///
    /// Withdrawals shrink k, so the check runs per share: the old reserves
    /// scaled to the remaining supply must not exceed the new reserves.
    pub fn quote_remove_liquidity(
        &self,
        lp_amount: u64,
        config: &QuoteConfig,
    ) -> AmmResult<WithdrawQuote> {
        let (amount_x, amount_y) = CpmmMath::get_expected_withdraw_amounts(
            lp_amount,
            self.reserve_x,
            self.reserve_y,
            self.lp_supply,
        )?;

        let remaining_supply = self.lp_supply - lp_amount;
        let new_x = self.reserve_x - amount_x;
        let new_y = self.reserve_y - amount_y;
        let fair_x = mul_div(self.reserve_x, remaining_supply, self.lp_supply)?;
        let fair_y = mul_div(self.reserve_y, remaining_supply, self.lp_supply)?;
        CpmmMath::assert_lp_value_is_increased(fair_x, fair_y, new_x, new_y).inspect_err(|_| {
            warn!(lp_amount, new_x, new_y, "Withdrawal dilutes remaining holders");
        })?;

        Ok(WithdrawQuote {
            lp_burned: lp_amount,
            amount_x,
            amount_y,
            min_amount_x: SlippageMath::min_amount_out(amount_x, config.slippage_tolerance)?,
            min_amount_y: SlippageMath::min_amount_out(amount_y, config.slippage_tolerance)?,
        })
    }
}

impl AmmPool for PoolSnapshot {
    fn get_amount_out(&self, direction: SwapDirection, amount_in: u64) -> AmmResult<u64> {
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);
        CpmmMath::get_amount_out(self.fee_rate, amount_in, reserve_in, reserve_out)
    }

    fn get_amount_in(&self, direction: SwapDirection, amount_out: u64) -> AmmResult<u64> {
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);
        CpmmMath::get_amount_in(self.fee_rate, amount_out, reserve_in, reserve_out)
    }

    fn get_reserves(&self) -> (u64, u64) {
        (self.reserve_x, self.reserve_y)
    }

    fn get_fee_rate(&self) -> u64 {
        self.fee_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pool() -> PoolSnapshot {
        PoolSnapshot::new(1_000_000, 2_000_000, 1_414_213, 30)
    }

    #[test]
    fn test_quote_exact_in() {
        let quote = pool()
            .quote_swap_exact_in(SwapDirection::XToY, 1000, &QuoteConfig::default())
            .unwrap();

        assert_eq!(quote.amount_out, 1992);
        assert_eq!(quote.limit_amount, 1982);
        assert_eq!(quote.protocol_fee, 0);
        assert!(quote.price_impact_pct > dec!(0));
    }

    #[test]
    fn test_quote_exact_in_reverse_direction() {
        let quote = pool()
            .quote_swap_exact_in(SwapDirection::YToX, 2000, &QuoteConfig::default())
            .unwrap();

        // 19_940_000 * 1_000_000 / 20_019_940_000
        assert_eq!(quote.amount_out, 996);
    }

    #[test]
    fn test_quote_exact_out() {
        let quote = pool()
            .quote_swap_exact_out(SwapDirection::XToY, 1992, &QuoteConfig::default())
            .unwrap();

        assert_eq!(quote.amount_in, 1000);
        assert_eq!(quote.limit_amount, 1006);
    }

    #[test]
    fn test_quote_exact_out_drains_pool() {
        assert_eq!(
            pool().quote_swap_exact_out(SwapDirection::XToY, 2_000_000, &QuoteConfig::default()),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_quote_protocol_fee_charged() {
        let quote = pool()
            .quote_swap_exact_in(SwapDirection::XToY, 100_000, &QuoteConfig::default())
            .unwrap();
        assert_eq!(quote.protocol_fee, 60);
    }

    #[test]
    fn test_price_impact_limit() {
        let config = QuoteConfig {
            max_price_impact_pct: Some(dec!(1)),
            ..QuoteConfig::default()
        };

        assert!(pool()
            .quote_swap_exact_in(SwapDirection::XToY, 1000, &config)
            .is_ok());
        assert!(matches!(
            pool().quote_swap_exact_in(SwapDirection::XToY, 100_000, &config),
            Err(AmmError::PriceImpactTooHigh { .. })
        ));
    }

    #[test]
    fn test_quote_on_empty_pool() {
        let empty = PoolSnapshot::new(0, 0, 0, 30);
        assert_eq!(
            empty.quote_swap_exact_in(SwapDirection::XToY, 1000, &QuoteConfig::default()),
            Err(AmmError::EmptyReserves)
        );
    }

    #[test]
    fn test_first_deposit_quote() {
        let empty = PoolSnapshot::new(0, 0, 0, 30);
        let quote = empty
            .quote_add_liquidity(1000, 2000, &QuoteConfig::default())
            .unwrap();

        assert_eq!((quote.amount_x, quote.amount_y), (1000, 2000));
        assert_eq!(quote.lp_minted, 414);
        assert_eq!(quote.min_lp_minted, 411);
    }

    #[test]
    fn test_proportional_deposit_quote() {
        let pool = PoolSnapshot::new(1000, 2000, 1000, 30);
        let quote = pool
            .quote_add_liquidity(100, 300, &QuoteConfig::default())
            .unwrap();

        assert_eq!((quote.amount_x, quote.amount_y), (100, 200));
        assert_eq!(quote.lp_minted, 100);
    }

    #[test]
    fn test_deposit_rejects_zero() {
        assert_eq!(
            pool().quote_add_liquidity(0, 100, &QuoteConfig::default()),
            Err(AmmError::ZeroAmount)
        );
    }

    #[test]
    fn test_withdraw_quote() {
        let pool = PoolSnapshot::new(1000, 2000, 1000, 30);
        let quote = pool
            .quote_remove_liquidity(100, &QuoteConfig::with_slippage(dec!(0.01)).unwrap())
            .unwrap();

        assert_eq!((quote.amount_x, quote.amount_y), (100, 200));
        assert_eq!((quote.min_amount_x, quote.min_amount_y), (99, 198));
    }

    #[test]
    fn test_withdraw_all_shares() {
        let pool = PoolSnapshot::new(1000, 2000, 1000, 30);
        let quote = pool
            .quote_remove_liquidity(1000, &QuoteConfig::default())
            .unwrap();
        assert_eq!((quote.amount_x, quote.amount_y), (1000, 2000));
    }

    #[test]
    fn test_trait_accessors() {
        let pool = pool();
        assert_eq!(pool.get_reserves(), (1_000_000, 2_000_000));
        assert_eq!(pool.get_fee_rate(), 30);
        assert_eq!(pool.get_amount_out(SwapDirection::XToY, 1000).unwrap(), 1992);
        assert_eq!(pool.get_amount_in(SwapDirection::XToY, 1992).unwrap(), 1000);
    }
}
