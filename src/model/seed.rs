//! Seed providers for weight initialization

/// Source of the seed used to initialize model weights
pub trait SeedProvider: Send + Sync {
    /// Produce a seed
    fn seed(&self) -> u64;
}

/// Always returns the same seed; used for reproducible runs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl SeedProvider for FixedSeed {
    fn seed(&self) -> u64 {
        self.0
    }
}

/// Draws a fresh seed from the operating system's entropy source
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropySeed;

impl SeedProvider for EntropySeed {
    fn seed(&self) -> u64 {
        rand::random()
    }
}

/// Pick a provider: fixed when a seed is configured, entropy otherwise
pub fn seed_provider(seed: Option<u64>) -> Box<dyn SeedProvider> {
    match seed {
        Some(seed) => Box::new(FixedSeed(seed)),
        None => Box::new(EntropySeed),
    }
}
