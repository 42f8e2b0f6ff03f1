//! Learning With Errors samples, as drawn on the LWE slides.

use crate::error::Result;
use crate::math::int_mod::IntMod;
use crate::math::matrix::Matrix;
use log::debug;
use rand::Rng;

/// An LWE instance `b = a * s + e` over `Z_Q`, with `a` of size `m x n`.
///
/// Without `e`, `s` is easy to recover from `(a, b)` by Gaussian elimination; with it, that is
/// the LWE problem.
#[derive(Clone, Debug, PartialEq)]
pub struct LweInstance<const Q: u64> {
    pub a: Matrix<IntMod<Q>>,
    pub s: Matrix<IntMod<Q>>,
    pub e: Matrix<IntMod<Q>>,
    pub b: Matrix<IntMod<Q>>,
}

impl<const Q: u64> LweInstance<Q> {
    /// Samples a uniform `m x n` matrix `a`, a uniform secret `s` and discrete gaussian noise `e`.
    pub fn sample<T: Rng, const NOISE_WIDTH_MILLIONTHS: u64>(
        m: usize,
        n: usize,
        rng: &mut T,
    ) -> Result<Self> {
        let a = Matrix::rand_uniform(m, n, rng);
        let s = Matrix::rand_uniform(n, 1, rng);
        let e = Matrix::rand_discrete_gaussian::<_, NOISE_WIDTH_MILLIONTHS>(m, 1, rng);
        let b = a.try_mul(&s)?.try_add(&e)?;
        debug!("sampled LWE instance with noise norm {}", e.norm());
        Ok(Self { a, s, e, b })
    }

    /// `a * s`, the noiseless `b` from the first LWE slide.
    pub fn without_noise(&self) -> Result<Matrix<IntMod<Q>>> {
        self.a.try_mul(&self.s)
    }

    /// The noise as small signed integers.
    pub fn noise(&self) -> Matrix<i64> {
        self.e.map_ring(|x| i64::from(*x))
    }

    /// Whether `secret` explains `b` up to noise of norm at most `bound`.
    pub fn is_consistent_with(&self, secret: &Matrix<IntMod<Q>>, bound: u64) -> Result<bool> {
        let residual = self.b.try_sub(&self.a.try_mul(secret)?)?;
        Ok(residual.norm() <= bound)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::discrete_gaussian::NUM_WIDTHS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const Q: u64 = 3329;
    const WIDTH: u64 = 6_400_000;

    #[test]
    fn test_sample_shapes_and_relation() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let lwe = LweInstance::<Q>::sample::<_, WIDTH>(3, 3, &mut rng).unwrap();
        assert_eq!(lwe.a.dimensions(), (3, 3));
        assert_eq!(lwe.s.dimensions(), (3, 1));
        assert_eq!(lwe.b.dimensions(), (3, 1));
        assert_eq!(
            lwe.b.try_sub(&lwe.without_noise().unwrap()).unwrap(),
            lwe.e
        );
    }

    #[test]
    fn test_noise_is_small() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let bound = (WIDTH as f64 / 1_000_000_f64 * NUM_WIDTHS as f64).ceil() as u64;
        for _ in 0..20 {
            let lwe = LweInstance::<Q>::sample::<_, WIDTH>(8, 4, &mut rng).unwrap();
            assert!(lwe.noise().norm() <= bound);
            assert!(lwe.is_consistent_with(&lwe.s, bound).unwrap());
        }
    }
}
