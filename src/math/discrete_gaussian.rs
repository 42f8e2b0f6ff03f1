//! Discrete gaussian sampling over the integers, used for LWE noise.
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::RwLock;

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

/// The support is cut off at this many widths on either side of zero.
pub const NUM_WIDTHS: usize = 8;

struct DiscreteGaussianTable {
    choices: Vec<i64>,
    dist: WeightedIndex<f64>,
}

static DISCRETE_GAUSSIAN_TABLES: Lazy<RwLock<HashMap<u64, DiscreteGaussianTable>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

impl DiscreteGaussianTable {
    fn init(noise_width: f64) -> Self {
        let max_val = (noise_width * (NUM_WIDTHS as f64)).ceil() as i64;
        let choices = (-max_val..=max_val).collect::<Vec<_>>();
        let weights = choices
            .iter()
            .map(|&i| f64::exp(-PI * f64::powi(i as f64, 2) / f64::powi(noise_width, 2)));
        // The weight at zero is always 1, so the table is never all-zero.
        let dist = WeightedIndex::new(weights).expect("discrete gaussian weights are valid");
        Self { choices, dist }
    }

    fn sample<T: Rng>(&self, rng: &mut T) -> i64 {
        self.choices[self.dist.sample(rng)]
    }
}

pub struct DiscreteGaussian {}

impl DiscreteGaussian {
    /// Samples an integer with probability proportional to `exp(-pi x^2 / w^2)`, where the width
    /// `w` is given in millionths. Tables are built lazily, once per width.
    pub fn sample<T: Rng, const NOISE_WIDTH_MILLIONTHS: u64>(rng: &mut T) -> i64 {
        assert!(NOISE_WIDTH_MILLIONTHS > 0, "noise width must be positive");
        if let Some(table) = DISCRETE_GAUSSIAN_TABLES
            .read()
            .expect("gaussian table lock poisoned")
            .get(&NOISE_WIDTH_MILLIONTHS)
        {
            return table.sample(rng);
        }

        let table = DiscreteGaussianTable::init(NOISE_WIDTH_MILLIONTHS as f64 / 1_000_000_f64);
        let ret = table.sample(rng);
        DISCRETE_GAUSSIAN_TABLES
            .write()
            .expect("gaussian table lock poisoned")
            .insert(NOISE_WIDTH_MILLIONTHS, table);
        ret
    }
}
