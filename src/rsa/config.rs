use std::env;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONSENSUALITY_WEIGHT, DEFAULT_RATIONALITY, DEFAULT_RSA_ITERATIONS,
};

use super::error::{RsaError, RsaResult};

/// How the consensuality vector enters the speaker update.
///
/// The speaker's utility for candidate `c` is `u = rationality * ln L[s, c]`.
/// The penalty is applied from the first pragmatic round onward; the literal
/// speaker `S_0` is never penalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsensualityPenalty {
    /// Consensuality is reported but never changes the speaker.
    Disabled,
    /// `u - weight * consensuality[c]` (a multiplicative `exp(-w·c)` in probability space).
    LogAdditive { weight: f64 },
    /// `u * (1 + weight * consensuality[c])`, which sharpens the log-penalty of
    /// generic candidates in proportion to how unlikely they already are.
    Multiplicative { weight: f64 },
}

impl Default for ConsensualityPenalty {
    fn default() -> Self {
        Self::LogAdditive {
            weight: DEFAULT_CONSENSUALITY_WEIGHT,
        }
    }
}

impl ConsensualityPenalty {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Disabled => 0.0,
            Self::LogAdditive { weight } | Self::Multiplicative { weight } => *weight,
        }
    }

    /// Applies the penalty to one utility value.
    pub fn apply(&self, utility: f64, consensuality: f64) -> f64 {
        match self {
            Self::Disabled => utility,
            Self::LogAdditive { weight } => utility - weight * consensuality,
            Self::Multiplicative { weight } => utility * (1.0 + weight * consensuality),
        }
    }
}

impl std::str::FromStr for ConsensualityPenalty {
    type Err = String;

    /// Parses `disabled`, `additive[:w]` or `multiplicative[:w]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let (form, weight) = match s.split_once(':') {
            Some((form, weight)) => {
                let weight: f64 = weight
                    .parse()
                    .map_err(|_| format!("invalid penalty weight: {weight}"))?;
                (form.to_string(), weight)
            }
            None => (s.clone(), DEFAULT_CONSENSUALITY_WEIGHT),
        };

        match form.as_str() {
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            "additive" | "log_additive" | "log-additive" => Ok(Self::LogAdditive { weight }),
            "multiplicative" => Ok(Self::Multiplicative { weight }),
            other => Err(format!("unknown consensuality penalty: {other}")),
        }
    }
}

/// Hyperparameters for one reranking run. Fixed for every group in the run.
#[derive(Debug, Clone, PartialEq)]
pub struct RsaConfig {
    /// Speaker sharpness (inverse softmax temperature). Must be finite and > 0.
    pub rationality: f64,

    /// Pragmatic depth `t`. Zero yields the literal (non-pragmatic) speaker.
    pub iterations: usize,

    /// Pairs per scorer call.
    pub batch_size: usize,

    pub penalty: ConsensualityPenalty,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            rationality: DEFAULT_RATIONALITY,
            iterations: DEFAULT_RSA_ITERATIONS,
            batch_size: DEFAULT_BATCH_SIZE,
            penalty: ConsensualityPenalty::default(),
        }
    }
}

impl RsaConfig {
    const ENV_RATIONALITY: &'static str = "GLIMPSE_RATIONALITY";
    const ENV_ITERATIONS: &'static str = "GLIMPSE_RSA_ITERATIONS";
    const ENV_BATCH_SIZE: &'static str = "GLIMPSE_BATCH_SIZE";
    const ENV_PENALTY: &'static str = "GLIMPSE_CONSENSUALITY_PENALTY";
    const ENV_CONSENSUALITY_WEIGHT: &'static str = "GLIMPSE_CONSENSUALITY_WEIGHT";

    pub fn with_rationality(mut self, rationality: f64) -> Self {
        self.rationality = rationality;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_penalty(mut self, penalty: ConsensualityPenalty) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn validate(&self) -> RsaResult<()> {
        if !self.rationality.is_finite() || self.rationality <= 0.0 {
            return Err(RsaError::InvalidConfig {
                reason: format!(
                    "rationality must be finite and greater than 0, got {}",
                    self.rationality
                ),
            });
        }

        if self.batch_size == 0 {
            return Err(RsaError::InvalidConfig {
                reason: "batch_size must be greater than 0".to_string(),
            });
        }

        let weight = self.penalty.weight();
        if !weight.is_finite() || weight < 0.0 {
            return Err(RsaError::InvalidConfig {
                reason: format!(
                    "consensuality weight must be finite and non-negative, got {}",
                    weight
                ),
            });
        }

        Ok(())
    }

    /// Reads `GLIMPSE_*` overrides on top of defaults. Unparseable values are rejected;
    /// range checks are left to [`RsaConfig::validate`] so later overrides can apply first.
    pub fn from_env() -> RsaResult<Self> {
        let defaults = Self::default();

        let rationality = parse_env(Self::ENV_RATIONALITY, defaults.rationality)?;
        let iterations = parse_env(Self::ENV_ITERATIONS, defaults.iterations)?;
        let batch_size = parse_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?;

        let mut penalty = match env::var(Self::ENV_PENALTY) {
            Ok(value) => value
                .parse::<ConsensualityPenalty>()
                .map_err(|reason| RsaError::InvalidConfig { reason })?,
            Err(_) => defaults.penalty,
        };

        if let Ok(value) = env::var(Self::ENV_CONSENSUALITY_WEIGHT) {
            let weight: f64 = value.trim().parse().map_err(|_| RsaError::InvalidConfig {
                reason: format!("{}='{}' is not a number", Self::ENV_CONSENSUALITY_WEIGHT, value),
            })?;
            penalty = match penalty {
                ConsensualityPenalty::Disabled => ConsensualityPenalty::Disabled,
                ConsensualityPenalty::LogAdditive { .. } => {
                    ConsensualityPenalty::LogAdditive { weight }
                }
                ConsensualityPenalty::Multiplicative { .. } => {
                    ConsensualityPenalty::Multiplicative { weight }
                }
            };
        }

        Ok(Self {
            rationality,
            iterations,
            batch_size,
            penalty,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> RsaResult<T> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| RsaError::InvalidConfig {
            reason: format!("{}='{}' could not be parsed", name, value),
        }),
        Err(_) => Ok(default),
    }
}
