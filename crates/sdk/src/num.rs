//! Fixed-point to decimal number conversion.

use alloy::primitives::{I256, U256};
use fastnum::{D256, dec256};

// 2^64, for limb-wise U256 -> D256 assembly.
const TWO_POW_64: D256 = dec256!(18446744073709551616);

/// Converts on-chain fixed-point integers to decimal numbers.
///
/// Synthetix V2 scales every magnitude field (prices, sizes, rates, fees,
/// leverage) by the same 18-decimal factor; [`Converter::WAD`] is that one
/// shared scale.
#[derive(Clone, Copy, Debug)]
pub struct Converter {
    scale: D256,
}

impl Converter {
    /// The 18-decimal scale shared by all Synthetix V2 magnitude fields.
    pub const WAD: Converter = Converter { scale: dec256!(1000000000000000000) };

    pub fn new(decimals: u8) -> Self {
        let scale = (0..decimals).fold(D256::ONE, |scale, _| scale * dec256!(10));
        Self { scale }
    }

    /// Exact conversion of an unsigned fixed-point value.
    pub fn from_unsigned(&self, raw: U256) -> D256 {
        let mut value = D256::ZERO;
        for limb in raw.into_limbs().into_iter().rev() {
            value = value * TWO_POW_64 + D256::from(limb);
        }
        value / self.scale
    }

    /// Exact conversion of a signed fixed-point value.
    pub fn from_signed(&self, raw: I256) -> D256 {
        let (sign, abs) = raw.into_sign_and_abs();
        let value = self.from_unsigned(abs);
        if sign.is_negative() { -value } else { value }
    }
}
