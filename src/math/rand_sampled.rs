//! Traits for randomly sampling from types (esp. rings).
use rand::Rng;

/// Used for sampling elements uniformly.
pub trait RandUniformSampled {
    /// Sample an element uniformly.
    fn rand_uniform<T: Rng>(rng: &mut T) -> Self;
}

/// Used for sampling elements with the discrete gaussian distribution.
pub trait RandDiscreteGaussianSampled {
    /// Sample an element with the discrete gaussian distribution.
    fn rand_discrete_gaussian<T: Rng, const NOISE_WIDTH_MILLIONTHS: u64>(rng: &mut T) -> Self;
}
