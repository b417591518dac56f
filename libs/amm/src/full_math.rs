//! Wide-integer helpers for u64 pool arithmetic
//!
//! Intermediate products are carried in u128 or U256 and only narrowed to the
//! u64 domain after the final division.

use crate::constants::U64_MAX;
use crate::error::{AmmError, AmmResult};

#[allow(clippy::assign_op_pattern)]
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer for three-factor products
        pub struct U256(4);
    }
}

pub use wide::U256;

/// floor(x * y / z) with the result bounded to u64
///
/// # Errors
/// `DivisionByZero` when `z == 0`, `Overflow` when the quotient exceeds `U64_MAX`.
pub fn mul_div(x: u64, y: u64, z: u64) -> AmmResult<u64> {
    if z == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let result = (x as u128) * (y as u128) / (z as u128);
    narrow_u128(result)
}

/// Narrow a u128 to the u64 domain
#[inline]
pub fn narrow_u128(value: u128) -> AmmResult<u64> {
    u64::try_from(value).map_err(|_| AmmError::Overflow)
}

/// Narrow a U256 to the u64 domain
#[inline]
pub fn narrow_u256(value: U256) -> AmmResult<u64> {
    if value > U256::from(U64_MAX) {
        return Err(AmmError::Overflow);
    }
    Ok(value.low_u64())
}

/// Widening product of two u64 values
#[inline]
pub fn mul_u128(a: u64, b: u64) -> u128 {
    (a as u128) * (b as u128)
}

/// floor(sqrt(value)) via Newton's method on integers
pub fn sqrt_u128(value: u128) -> u128 {
    if value < 2 {
        return value;
    }

    // Start above the root; every iterate then decreases monotonically
    let mut x = value;
    let mut y = (x >> 1) + (x & 1);
    while y < x {
        x = y;
        y = (x + value / x) >> 1;
    }
    x
}
