//! Regev encryption of a single plaintext mod `P` under an LWE secret mod `Q`.
//!
//! Encryption: `c = a * s + e + floor(Q / P) * mu`. Decryption: round `c - a * s` to the nearest
//! multiple of `floor(Q / P)`. Parameters are toy-sized; nothing here aims at security.

use crate::error::{Error, Result};
use crate::math::int_mod::IntMod;
use crate::math::matrix::Matrix;
use crate::math::rand_sampled::RandDiscreteGaussianSampled;
use log::debug;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegevParams {
    /// Secret length.
    pub N: usize,
    /// Ciphertext modulus.
    pub Q: u64,
    /// Plaintext modulus.
    pub P: u64,
    pub NOISE_WIDTH_MILLIONTHS: u64,
}

impl RegevParams {
    /// `floor(Q / P)`, the scaling applied to the plaintext.
    pub const fn delta(&self) -> u64 {
        self.Q / self.P
    }

    /// A loose bound on the noise a fresh ciphertext can carry and still decrypt.
    pub const fn noise_budget(&self) -> u64 {
        self.delta() / 2
    }
}

pub const DEMO_REGEV_PARAMS: RegevParams = RegevParams {
    N: 16,
    Q: 3329,
    P: 2,
    NOISE_WIDTH_MILLIONTHS: 6_400_000,
};

/// A Regev ciphertext `(a, c)` with `a` a `1 x N` row.
#[derive(Clone, Debug, PartialEq)]
pub struct Ciphertext<const Q: u64> {
    pub a: Matrix<IntMod<Q>>,
    pub c: IntMod<Q>,
}

impl<const Q: u64> Ciphertext<Q> {
    /// Homomorphic addition: decrypts to the sum of the plaintexts mod `P`.
    pub fn try_add(&self, other: &Ciphertext<Q>) -> Result<Ciphertext<Q>> {
        Ok(Ciphertext {
            a: self.a.try_add(&other.a)?,
            c: self.c + other.c,
        })
    }

    /// Homomorphic multiplication by a small public constant. Noise grows by the same factor.
    pub fn scale(&self, k: u64) -> Ciphertext<Q> {
        let k = IntMod::from(k);
        Ciphertext {
            a: self.a.scale(&k),
            c: self.c * k,
        }
    }
}

pub struct Regev<const N: usize, const Q: u64, const P: u64, const NOISE_WIDTH_MILLIONTHS: u64>;

pub type DemoRegev = Regev<
    { DEMO_REGEV_PARAMS.N },
    { DEMO_REGEV_PARAMS.Q },
    { DEMO_REGEV_PARAMS.P },
    { DEMO_REGEV_PARAMS.NOISE_WIDTH_MILLIONTHS },
>;

impl<const N: usize, const Q: u64, const P: u64, const NOISE_WIDTH_MILLIONTHS: u64>
    Regev<N, Q, P, NOISE_WIDTH_MILLIONTHS>
{
    pub const PARAMS: RegevParams = RegevParams {
        N,
        Q,
        P,
        NOISE_WIDTH_MILLIONTHS,
    };

    /// Samples a uniform `N x 1` secret.
    pub fn keygen<T: Rng>(rng: &mut T) -> Matrix<IntMod<Q>> {
        Matrix::rand_uniform(N, 1, rng)
    }

    fn inner_product(a: &Matrix<IntMod<Q>>, s: &Matrix<IntMod<Q>>) -> Result<IntMod<Q>> {
        if s.dimensions() != (N, 1) || a.dimensions() != (1, N) {
            return Err(Error::DimensionMismatch {
                op: "regev",
                lhs: a.dimensions(),
                rhs: s.dimensions(),
            });
        }
        Ok(a.try_mul(s)?[(0, 0)])
    }

    pub fn encrypt<T: Rng>(
        s: &Matrix<IntMod<Q>>,
        mu: IntMod<P>,
        rng: &mut T,
    ) -> Result<Ciphertext<Q>> {
        let a = Matrix::rand_uniform(1, N, rng);
        let e = IntMod::<Q>::rand_discrete_gaussian::<_, NOISE_WIDTH_MILLIONTHS>(rng);
        let c = Self::inner_product(&a, s)? + e + mu.scale_up_into();
        debug!("regev encrypt: mu = {}, noise = {}", mu, i64::from(e));
        Ok(Ciphertext { a, c })
    }

    pub fn decrypt(s: &Matrix<IntMod<Q>>, ct: &Ciphertext<Q>) -> Result<IntMod<P>> {
        let raw = ct.c - Self::inner_product(&ct.a, s)?;
        Ok(raw.round_down_into())
    }

    /// The noise carried by `ct`, assuming it encrypts `mu`.
    pub fn noise(s: &Matrix<IntMod<Q>>, ct: &Ciphertext<Q>, mu: IntMod<P>) -> Result<i64> {
        let raw = ct.c - Self::inner_product(&ct.a, s)? - mu.scale_up_into();
        Ok(i64::from(raw))
    }
}
