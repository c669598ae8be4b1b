//! Conversion from a proof-of-work target to expected attempts.

use serde::{Deserialize, Serialize};
use sharechain_types::{U256, U512};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Expected hash attempts, or a sum of them.
///
/// A single share's work fits in 256 bits, but sums are held in 512 so that
/// a chain of maximum-work shares still orders correctly. Arithmetic wraps
/// modulo 2^512; subtracting what was added is always exact.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkUnit(U512);

impl WorkUnit {
    pub const ZERO: Self = Self(U512([0u64; 8]));

    pub fn new(value: U256) -> Self {
        Self(U512::from(value))
    }

    /// The value as 256 bits, saturating at `U256::MAX`.
    pub fn as_u256(&self) -> U256 {
        U256::try_from(self.0).unwrap_or(U256::MAX)
    }

    pub fn as_u512(&self) -> U512 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for WorkUnit {
    fn from(value: u64) -> Self {
        Self(U512::from(value))
    }
}

impl Add for WorkUnit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.overflowing_add(rhs.0).0)
    }
}

impl AddAssign for WorkUnit {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for WorkUnit {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.overflowing_sub(rhs.0).0)
    }
}

impl SubAssign for WorkUnit {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for WorkUnit {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, w| acc + w)
    }
}

impl fmt::Debug for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkUnit({})", self.0)
    }
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `floor(2^256 / (target + 1))`, the average number of attempts needed to
/// find a hash at or below `target`.
///
/// 2^256 does not fit in 256 bits, so this uses the identity
/// `floor(2^256 / d) = floor((2^256 - d) / d) + 1` with `d = target + 1`.
/// A zero target would need 2^256 attempts and saturates to `U256::MAX`.
pub fn work_from_target(target: U256) -> WorkUnit {
    if target.is_zero() {
        return WorkUnit::new(U256::MAX);
    }
    if target == U256::MAX {
        return WorkUnit::from(1);
    }
    let divisor = target + U256::one();
    WorkUnit::new((U256::MAX - target) / divisor + U256::one())
}
