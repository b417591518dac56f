//! End-to-end quoting flow
//!
//! Walks a pool through its first deposit, a proportional deposit, swaps in
//! both directions and a withdrawal, feeding each projected state into the
//! next quote the way a transaction builder would.

use cpmm_amm::{
    dec, AmmError, AmmPool, CpmmMath, PoolSnapshot, QuoteConfig, SwapDirection,
    MINIMUM_LIQUIDITY_LOCK, U64_MAX,
};

#[test]
fn test_pool_lifecycle() {
    let config = QuoteConfig::with_slippage(dec!(0.01)).unwrap();

    // First deposit sets the price and burns the lock
    let mut pool = PoolSnapshot::new(0, 0, 0, 30);
    let deposit = pool.quote_add_liquidity(1_000_000, 2_000_000, &config).unwrap();
    assert_eq!(deposit.lp_minted, 1_414_213 - MINIMUM_LIQUIDITY_LOCK);

    pool = PoolSnapshot::new(
        deposit.amount_x,
        deposit.amount_y,
        deposit.lp_minted + MINIMUM_LIQUIDITY_LOCK,
        30,
    );

    // Swap X for Y
    let swap = pool
        .quote_swap_exact_in(SwapDirection::XToY, 1000, &config)
        .unwrap();
    assert_eq!(swap.amount_out, 1992);
    assert_eq!(swap.limit_amount, 1972);

    pool = PoolSnapshot::new(
        pool.reserve_x + swap.amount_in - swap.protocol_fee,
        pool.reserve_y - swap.amount_out,
        pool.lp_supply,
        30,
    );
    let (x, y) = pool.get_reserves();
    assert!(CpmmMath::assert_lp_value_is_increased(1_000_000, 2_000_000, x, y).is_ok());

    // Proportional deposit at the new ratio
    let deposit = pool.quote_add_liquidity(10_000, 10_000, &config).unwrap();
    assert_eq!(deposit.amount_y, 10_000);
    assert!(deposit.amount_x < 10_000);
    assert!(deposit.lp_minted > 0);

    // Withdraw half the supply
    let withdraw = pool
        .quote_remove_liquidity(pool.lp_supply / 2, &config)
        .unwrap();
    assert!(withdraw.amount_x <= pool.reserve_x / 2 + 1);
    assert!(withdraw.amount_y <= pool.reserve_y / 2 + 1);
}

#[test]
fn test_golden_examples() {
    assert_eq!(
        CpmmMath::calc_optimal_coin_values(1000, 2000, 0, 0).unwrap(),
        (1000, 2000)
    );
    assert_eq!(
        CpmmMath::get_expected_liquidity_amount(1000, 2000, 0, 0, 0).unwrap(),
        414
    );
    assert_eq!(
        CpmmMath::calc_optimal_coin_values(100, 300, 1000, 2000).unwrap(),
        (100, 200)
    );
    assert_eq!(
        CpmmMath::get_expected_liquidity_amount(100, 200, 1000, 2000, 1000).unwrap(),
        100
    );
    assert_eq!(
        CpmmMath::get_amount_out(30, 1000, 1_000_000, 2_000_000).unwrap(),
        1992
    );
}

#[test]
fn test_boundary_failures() {
    assert_eq!(cpmm_amm::mul_div(U64_MAX, 2, 1), Err(AmmError::Overflow));
    assert_eq!(cpmm_amm::mul_div(5, 7, 0), Err(AmmError::DivisionByZero));

    assert!(matches!(
        CpmmMath::get_amount_out(2001, 1000, 1_000_000, 2_000_000),
        Err(AmmError::InvalidFeeRate { .. })
    ));
    assert!(CpmmMath::get_amount_out(2000, 1000, 1_000_000, 2_000_000).is_ok());

    assert_eq!(
        CpmmMath::get_amount_out(30, 0, 1000, 2000),
        Err(AmmError::ZeroAmount)
    );
    assert_eq!(
        CpmmMath::get_amount_out(30, 1000, 0, 2000),
        Err(AmmError::EmptyReserves)
    );
}
