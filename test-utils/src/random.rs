use std::{
    num::ParseIntError,
    ops::{Bound, RangeBounds},
    str::FromStr,
};

pub use rand::{CryptoRng, Rng, RngCore, SeedableRng, seq::IteratorRandom};
use rand::{
    distr::{Alphanumeric, Distribution, StandardUniform},
    rngs::StdRng,
};
use rand_chacha::ChaChaRng;
use rstest::fixture;

/// Set to replay a failing randomized test with the seed it printed.
pub const SEED_ENV_VAR: &str = "ANTELOPE_TEST_SEED";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Seed(pub u64);

impl Seed {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng().next_u64())
    }

    /// The seed from [`SEED_ENV_VAR`] when set, a fresh one otherwise.
    #[must_use]
    pub fn from_env_or_entropy() -> Self {
        std::env::var(SEED_ENV_VAR)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Self::from_entropy)
    }

    pub fn print_with_decoration(&self, test_name: &str) {
        println!("{test_name} seed: {} (replay with {SEED_ENV_VAR}={0})", self.0);
    }
}

impl FromStr for Seed {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u64> for Seed {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl Distribution<Seed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Seed {
        Seed(rng.next_u64())
    }
}

/// Deterministic, seedable RNG for tests.
#[derive(Debug, Clone)]
pub struct TestRng(ChaChaRng);

impl TestRng {
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self(ChaChaRng::seed_from_u64(seed.0))
    }
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
}

impl CryptoRng for TestRng {}

#[must_use]
pub fn make_seedable_rng(seed: Seed) -> impl Rng + CryptoRng {
    TestRng::new(seed)
}

fn random_len(rng: &mut impl Rng, size: impl RangeBounds<usize>) -> usize {
    let start = match size.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n + 1,
        Bound::Unbounded => 0,
    };
    let end = match size.end_bound() {
        Bound::Included(&n) => n + 1,
        Bound::Excluded(&n) => n,
        Bound::Unbounded => usize::MAX,
    };
    rng.random_range(start..end)
}

pub fn gen_random_bytes(rng: &mut impl Rng, size: impl RangeBounds<usize>) -> Vec<u8> {
    let mut bytes = vec![0; random_len(rng, size)];
    rng.fill_bytes(&mut bytes);
    bytes
}

pub fn gen_random_string(rng: &mut impl Rng, size: impl RangeBounds<usize>) -> String {
    let len = random_len(rng, size);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Picks `n` characters out of `alphabet`.
pub fn gen_random_string_from(rng: &mut impl Rng, alphabet: &[u8], n: usize) -> String {
    (0..n)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

#[fixture]
pub fn random_seed() -> Seed {
    Seed::from_env_or_entropy()
}

#[fixture]
pub fn rng(random_seed: Seed) -> impl Rng + CryptoRng {
    random_seed.print_with_decoration("rng");
    make_seedable_rng(random_seed)
}
