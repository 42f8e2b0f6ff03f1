//! Math-related constructs.
pub mod discrete_gaussian;
pub mod int_mod;
pub mod matrix;
pub mod rand_sampled;
pub mod ring_elem;
