/// Simulation settings shared by the simulator facade and algorithm drivers.
///
/// Environment overrides:
///   ASTRAQSIM_SEED       fixed RNG seed (u64) for reproducible runs
///   ASTRAQSIM_TOLERANCE  normalization tolerance (f64)
use crate::core::register::NORM_TOLERANCE;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

pub const SEED_ENV: &str = "ASTRAQSIM_SEED";
pub const TOLERANCE_ENV: &str = "ASTRAQSIM_TOLERANCE";

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Fixed seed for deterministic measurement; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Tolerance used when checking Σ|αᵢ|² = 1.
    pub tolerance: f64,
    /// How many measurement batches Simon's driver draws before giving up.
    pub simon_max_attempts: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tolerance: NORM_TOLERANCE,
            simon_max_attempts: 64,
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_simon_max_attempts(mut self, attempts: usize) -> Self {
        self.simon_max_attempts = attempts;
        self
    }

    /// Defaults overlaid with any environment overrides.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => warn!(value = %raw, "ignoring unparseable {SEED_ENV}"),
            }
        }
        if let Some(raw) = lookup(TOLERANCE_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(tol) if tol > 0.0 => config.tolerance = tol,
                _ => warn!(value = %raw, "ignoring invalid {TOLERANCE_ENV}"),
            }
        }
        config
    }

    /// RNG for this configuration: seeded when a seed is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let c = SimConfig::default();
        assert_eq!(c.seed, None);
        assert_eq!(c.tolerance, 1e-5);
        assert_eq!(c.simon_max_attempts, 64);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let c = SimConfig::default().with_seed(1234);
        let a: Vec<f64> = c.rng().sample_iter(rand::distributions::Standard).take(5).collect();
        let b: Vec<f64> = c.rng().sample_iter(rand::distributions::Standard).take(5).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lookup_overrides() {
        let c = SimConfig::from_lookup(|key| match key {
            SEED_ENV => Some("77".into()),
            TOLERANCE_ENV => Some("1e-8".into()),
            _ => None,
        });
        assert_eq!(c.seed, Some(77));
        assert_eq!(c.tolerance, 1e-8);
    }

    #[test]
    fn test_lookup_ignores_garbage() {
        let c = SimConfig::from_lookup(|key| match key {
            SEED_ENV => Some("not-a-number".into()),
            TOLERANCE_ENV => Some("-1".into()),
            _ => None,
        });
        assert_eq!(c, SimConfig::default());
    }
}
