// Prime field used by the whole protocol: p = 3 * 2^30 + 1.
// The multiplicative group has order 3 * 2^30, generated by 5, so it
// contains subgroups of every power-of-two size up to 2^30.

use crate::error::StarkError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

pub const MODULUS: u64 = 3 * (1 << 30) + 1; // 3221225473
pub const GENERATOR: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldElement {
    pub value: u64,
}

impl Hash for FieldElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl FieldElement {
    pub const MODULUS: u64 = MODULUS;

    #[inline]
    pub fn new(value: u64) -> Self {
        Self {
            value: value % Self::MODULUS,
        }
    }

    #[inline]
    pub fn zero() -> Self {
        Self { value: 0 }
    }

    #[inline]
    pub fn one() -> Self {
        Self { value: 1 }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Generator of the full multiplicative group of order p - 1.
    #[inline]
    pub fn generator() -> Self {
        Self { value: GENERATOR }
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; 8] {
        self.value.to_le_bytes()
    }

    /// Reduce an arbitrary 128-bit integer into the field.
    pub fn from_u128_mod_order(value: u128) -> Self {
        Self {
            value: (value % Self::MODULUS as u128) as u64,
        }
    }

    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut result = Self::one();

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }

        result
    }

    /// Modular inverse via Fermat's little theorem: a^(p-2) mod p.
    pub fn inverse(self) -> Result<Self, StarkError> {
        if self.is_zero() {
            return Err(StarkError::DivisionByZero);
        }
        Ok(self.pow(Self::MODULUS - 2))
    }

    pub fn divide(self, rhs: Self) -> Result<Self, StarkError> {
        Ok(self * rhs.inverse()?)
    }
}

impl Add for FieldElement {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let mut sum = self.value + rhs.value;
        if sum >= Self::MODULUS {
            sum -= Self::MODULUS;
        }
        Self { value: sum }
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FieldElement {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let diff = if self.value >= rhs.value {
            self.value - rhs.value
        } else {
            self.value + Self::MODULUS - rhs.value
        };
        Self { value: diff }
    }
}

impl SubAssign for FieldElement {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for FieldElement {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let product = (self.value as u128) * (rhs.value as u128);
        Self {
            value: (product % Self::MODULUS as u128) as u64,
        }
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for FieldElement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        if self.value == 0 {
            self
        } else {
            Self {
                value: Self::MODULUS - self.value,
            }
        }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for FieldElement {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.parse::<u64>()?))
    }
}
