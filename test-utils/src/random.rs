use std::ops::Range;

use rand_chacha::ChaChaRng;
use randomness::{CryptoRng, Rng, SeedableRng, distr::Alphanumeric};
use rstest::fixture;

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64);

impl Seed {
    pub fn from_entropy() -> Self {
        Seed(randomness::make_true_rng().random::<u64>())
    }

    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Print the seed so that failing tests can be reproduced
#[fixture]
pub fn random_seed() -> Seed {
    let seed = Seed::from_entropy();
    println!("Using random seed: {}", seed.as_u64());
    seed
}

pub fn make_seedable_rng(seed: Seed) -> impl Rng + CryptoRng {
    ChaChaRng::seed_from_u64(seed.as_u64())
}

pub fn make_random_alphanumeric_string(rng: &mut impl Rng, length: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn gen_random_string(rng: &mut impl Rng, length_range: Range<usize>) -> String {
    let length = rng.random_range(length_range);
    make_random_alphanumeric_string(rng, length)
}
