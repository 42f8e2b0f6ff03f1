//! Generic ring-related traits.
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A generic element of a ring (with `1`), supporting the operations `+=`, `-=`, `*=` and the
/// special elements `0` and `1`.
///
/// Unlike a textbook ring this is also implemented for `f64`, so equality is only `PartialEq`.
/// Non-inplace arithmetic lives on references, see [`RingElementRef`].
pub trait RingElement:
    Sized
    + Clone
    + PartialEq
    + Debug
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
where
    for<'a> &'a Self: RingElementRef<Self>,
{
    /// Constructs the zero element (additive identity) of the ring.
    fn zero() -> Self;
    /// Constructs the one element (multiplicative identity) of the ring.
    fn one() -> Self;
}

/// A reference to a RingElement that supports non-inplace ring operations, so that matrices over
/// a ring never need to clone their entries to combine them.
pub trait RingElementRef<Owned: RingElement>:
    Sized
    + Clone
    + Add<Self, Output = Owned>
    + Sub<Self, Output = Owned>
    + Mul<Self, Output = Owned>
    + Neg<Output = Owned>
where
    for<'a> &'a Owned: RingElementRef<Owned>,
{
}

/// A ring element with a notion of size, e.g. the centered absolute value for `Z_q`.
pub trait NormedRingElement {
    fn norm(&self) -> u64;
}

macro_rules! primitive_ring_element {
    ($t: ty, $zero: expr, $one: expr) => {
        impl RingElement for $t {
            fn zero() -> Self {
                $zero
            }
            fn one() -> Self {
                $one
            }
        }

        impl RingElementRef<$t> for &$t {}
    };
}

primitive_ring_element!(i64, 0, 1);
primitive_ring_element!(f64, 0.0, 1.0);

impl NormedRingElement for i64 {
    fn norm(&self) -> u64 {
        self.unsigned_abs()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sum_of_products<R: RingElement>(xs: &[R], ys: &[R]) -> R
    where
        for<'a> &'a R: RingElementRef<R>,
    {
        let mut acc = R::zero();
        for (x, y) in xs.iter().zip(ys) {
            acc += &(x * y);
        }
        acc
    }

    #[test]
    fn test_primitive_rings() {
        assert_eq!(sum_of_products(&[1_i64, 2, 3], &[4, 5, 6]), 32);
        assert_eq!(sum_of_products(&[0.5_f64, 2.0], &[4.0, 0.25]), 2.5);
        assert_eq!(i64::one() - i64::one(), i64::zero());
        assert_eq!((-7_i64).norm(), 7);
    }
}
