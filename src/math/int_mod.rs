//! The ring `Z_n` of integers modulo `n`.

use crate::math::discrete_gaussian::DiscreteGaussian;
use crate::math::rand_sampled::*;
use crate::math::ring_elem::*;
use rand::Rng;
use std::cmp::min;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Integers modulo `N` with overloaded modular arithmetic operations (`+`, `-`, `*`, unary `-`).
///
/// Elements are stored as a `u64` in reduced form (`0 <= a < N`). Every public conversion reduces,
/// so the arithmetic below may rely on both operands being reduced. Products are computed in
/// `u128`, so any modulus that fits in a `u64` works. `N` must be at least `2`.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct IntMod<const N: u64> {
    a: u64,
}

/// Conversions

impl<const N: u64> From<IntMod<N>> for u64 {
    /// Extracts the reduced form modulo `N`.
    fn from(a: IntMod<N>) -> Self {
        a.a
    }
}

impl<const N: u64> From<u64> for IntMod<N> {
    /// Converts u64 to Z_N by modular reduction.
    fn from(a: u64) -> Self {
        IntMod { a: a % N }
    }
}

impl<const N: u64> From<i64> for IntMod<N> {
    /// Converts i64 to Z_N by modular reduction, so that e.g. `-1` becomes `N - 1`.
    fn from(a: i64) -> Self {
        if a < 0 {
            -IntMod::from(a.unsigned_abs())
        } else {
            IntMod::from(a as u64)
        }
    }
}

impl<const N: u64> From<&i64> for IntMod<N> {
    fn from(a: &i64) -> Self {
        IntMod::from(*a)
    }
}

impl<const N: u64> From<IntMod<N>> for i64 {
    /// Converts from Z_N to the i64 of the smallest absolute value with the correct remainder.
    fn from(a: IntMod<N>) -> Self {
        if a.a <= (N - 1) / 2 {
            a.a as i64
        } else {
            -((N - a.a) as i64)
        }
    }
}

/// Math operations on owned `IntMod<N>`, including [`RingElement`] implementation.

impl<const N: u64> RingElement for IntMod<N> {
    fn zero() -> Self {
        0_u64.into()
    }
    fn one() -> Self {
        1_u64.into()
    }
}

impl<const N: u64> Add for IntMod<N> {
    type Output = IntMod<N>;
    fn add(self, rhs: Self) -> Self::Output {
        let sum = self.a as u128 + rhs.a as u128;
        IntMod {
            a: (sum % N as u128) as u64,
        }
    }
}

impl<const N: u64> AddAssign for IntMod<N> {
    fn add_assign(&mut self, rhs: Self) {
        self.a = (*self + rhs).a;
    }
}

impl<const N: u64> Mul for IntMod<N> {
    type Output = IntMod<N>;
    fn mul(self, rhs: Self) -> Self::Output {
        let prod = self.a as u128 * rhs.a as u128;
        IntMod {
            a: (prod % N as u128) as u64,
        }
    }
}

impl<const N: u64> MulAssign for IntMod<N> {
    fn mul_assign(&mut self, rhs: Self) {
        self.a = (*self * rhs).a;
    }
}

impl<const N: u64> Sub for IntMod<N> {
    type Output = IntMod<N>;
    fn sub(self, rhs: Self) -> Self::Output {
        if self.a >= rhs.a {
            IntMod { a: self.a - rhs.a }
        } else {
            IntMod {
                a: self.a + (N - rhs.a),
            }
        }
    }
}

impl<const N: u64> SubAssign for IntMod<N> {
    fn sub_assign(&mut self, rhs: Self) {
        self.a = (*self - rhs).a
    }
}

impl<const N: u64> Neg for IntMod<N> {
    type Output = IntMod<N>;
    fn neg(self) -> Self::Output {
        if self.a == 0 {
            self
        } else {
            IntMod { a: N - self.a }
        }
    }
}

/// Math operations on borrows `&IntMod<N>`, including [`RingElementRef`] implementation.

impl<const N: u64> RingElementRef<IntMod<N>> for &IntMod<N> {}

impl<const N: u64> Neg for &IntMod<N> {
    type Output = IntMod<N>;
    fn neg(self) -> Self::Output {
        -*self
    }
}

impl<const N: u64> Add for &IntMod<N> {
    type Output = IntMod<N>;
    fn add(self, rhs: Self) -> Self::Output {
        *self + *rhs
    }
}

impl<const N: u64> AddAssign<&IntMod<N>> for IntMod<N> {
    fn add_assign(&mut self, rhs: &Self) {
        self.a = (*self + *rhs).a
    }
}

impl<const N: u64> Sub for &IntMod<N> {
    type Output = IntMod<N>;
    fn sub(self, rhs: Self) -> Self::Output {
        *self - *rhs
    }
}

impl<const N: u64> SubAssign<&IntMod<N>> for IntMod<N> {
    fn sub_assign(&mut self, rhs: &Self) {
        self.a = (*self - *rhs).a
    }
}

impl<const N: u64> Mul for &IntMod<N> {
    type Output = IntMod<N>;
    fn mul(self, rhs: Self) -> Self::Output {
        *self * *rhs
    }
}

impl<const N: u64> MulAssign<&IntMod<N>> for IntMod<N> {
    fn mul_assign(&mut self, rhs: &Self) {
        self.a = (*self * *rhs).a
    }
}

/// Changing modulus

impl<const N: u64> IntMod<N> {
    /// Maps `Z_N` into `Z_M` by sending `0 <= a < N` to `a * floor(M / N)`. We require `N <= M`.
    /// This is how a plaintext mod `p` is encoded before adding it to an LWE sample mod `q`.
    pub fn scale_up_into<const M: u64>(self) -> IntMod<M> {
        assert!(N <= M);
        let ratio = M / N;
        (u64::from(self) * ratio).into()
    }

    /// Maps `Z_N` into `Z_M` by rounding `0 <= a < N` to the nearest multiple of `N / M`, and
    /// dividing. Acts as an inverse of `scale_up_into` with tolerance to small additive noise.
    /// We require `N >= M`.
    pub fn round_down_into<const M: u64>(self) -> IntMod<M> {
        assert!(N >= M);
        let ratio = N / M;
        ((u64::from(self) + ratio / 2) / ratio).into()
    }
}

/// Formatting

impl<const N: u64> fmt::Debug for IntMod<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a <= 3 * (N / 4) {
            write!(f, "{}", self.a)
        } else {
            write!(f, "-{}", N - self.a)
        }
    }
}

impl<const N: u64> fmt::Display for IntMod<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a)
    }
}

/// Random sampling

impl<const N: u64> RandUniformSampled for IntMod<N> {
    fn rand_uniform<T: Rng>(rng: &mut T) -> Self {
        rng.gen_range(0..N).into()
    }
}

impl<const N: u64> RandDiscreteGaussianSampled for IntMod<N> {
    fn rand_discrete_gaussian<T: Rng, const NOISE_WIDTH_MILLIONTHS: u64>(rng: &mut T) -> Self {
        DiscreteGaussian::sample::<_, NOISE_WIDTH_MILLIONTHS>(rng).into()
    }
}

impl<const N: u64> NormedRingElement for IntMod<N> {
    fn norm(&self) -> u64 {
        let pos: u64 = u64::from(*self);
        let neg: u64 = u64::from(-*self);
        min(pos, neg)
    }
}
