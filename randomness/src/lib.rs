pub use rand::{CryptoRng, Rng, RngCore, SeedableRng, distr, seq};

/// A cryptographically secure rng seeded from the operating system
#[must_use]
pub fn make_true_rng() -> impl Rng + CryptoRng {
    rand::rngs::StdRng::from_os_rng()
}
