//! ACS configuration and local-search stopping rules.

use std::time::Duration;

use crate::error::ConfigError;

/// Stopping rule for the ant-level stochastic local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlsStop {
    /// Stop as soon as one swap attempt leaves the objective unchanged.
    ///
    /// A rejected (reverted) swap also leaves the value unchanged, so the
    /// search ends at its first non-improving probe. This is not a local
    /// optimum check.
    #[default]
    FirstUnchanged,

    /// Stop after this many consecutive non-improving swap attempts.
    Stagnation(usize),
}

/// Configuration for the Ant Colony System.
///
/// Pheromone and heuristic matrices are indexed by (job, position).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_flowshop::acs::AcsConfig;
///
/// let config = AcsConfig::default()
///     .with_ants(20)
///     .with_q0(0.8)
///     .with_construction_budget(Duration::from_secs(5))
///     .with_intensification_budget(Duration::from_secs(2))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcsConfig {
    /// Ants constructed per iteration.
    pub n_ants: usize,

    /// Pheromone exponent in the selection probability.
    pub alpha: f64,

    /// Heuristic exponent, used by both branches of the transition rule.
    pub beta: f64,

    /// Evaporation and local decay rate in [0, 1).
    pub rho: f64,

    /// Probability of the exploitation branch in [0, 1].
    pub q0: f64,

    /// Pheromone level `τ0` at initialization and the local decay target.
    pub initial_pheromone: f64,

    /// Numerator `c` of the heuristic `c / max(1, due_date)`.
    pub heuristic_constant: f64,

    /// Numerator `k` of the elitist deposit `k / best_objective`.
    pub deposit_constant: f64,

    /// Multiplier applied on top of `rho * delta` when depositing.
    pub deposit_scale: f64,

    /// Soft cap on construction iterations. 0 = no limit.
    pub max_iterations: usize,

    /// Wall-clock budget of the construction phase.
    pub construction_budget: Duration,

    /// Wall-clock budget of the local-search intensification phase.
    pub intensification_budget: Duration,

    /// Ant-level local search stopping rule.
    pub sls_stop: SlsStop,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            n_ants: 10,
            alpha: 0.1,
            beta: 2.0,
            rho: 0.2,
            q0: 0.9,
            initial_pheromone: 1e-4,
            heuristic_constant: 1e-4,
            deposit_constant: 1.0,
            deposit_scale: 1000.0,
            max_iterations: 10_000,
            construction_budget: Duration::from_secs(30),
            intensification_budget: Duration::from_secs(15),
            sls_stop: SlsStop::default(),
            seed: None,
        }
    }
}

impl AcsConfig {
    pub fn with_ants(mut self, n: usize) -> Self {
        self.n_ants = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    pub fn with_initial_pheromone(mut self, tau0: f64) -> Self {
        self.initial_pheromone = tau0;
        self
    }

    pub fn with_heuristic_constant(mut self, c: f64) -> Self {
        self.heuristic_constant = c;
        self
    }

    /// Sets the deposit numerator `k` and the scale factor.
    pub fn with_deposit(mut self, constant: f64, scale: f64) -> Self {
        self.deposit_constant = constant;
        self.deposit_scale = scale;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_construction_budget(mut self, budget: Duration) -> Self {
        self.construction_budget = budget;
        self
    }

    pub fn with_intensification_budget(mut self, budget: Duration) -> Self {
        self.intensification_budget = budget;
        self
    }

    pub fn with_sls_stop(mut self, stop: SlsStop) -> Self {
        self.sls_stop = stop;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_ants == 0 {
            return Err(ConfigError::NoAnts);
        }
        non_negative("alpha", self.alpha)?;
        non_negative("beta", self.beta)?;
        rate("rho", self.rho)?;
        unit_interval("q0", self.q0)?;
        positive("initial_pheromone", self.initial_pheromone)?;
        positive("heuristic_constant", self.heuristic_constant)?;
        positive("deposit_constant", self.deposit_constant)?;
        positive("deposit_scale", self.deposit_scale)?;
        if self.sls_stop == SlsStop::Stagnation(0) {
            return Err(ConfigError::ZeroStagnation);
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotRate { name, value })
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotUnitInterval { name, value })
    }
}
