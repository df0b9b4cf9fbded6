//! ACS execution loop.
//!
//! # Algorithm
//!
//! 1. Initialize the desirability model and clear the global best
//! 2. Construction phase, until its wall-clock budget elapses:
//!    a. every ant builds a sequence (with local decay); the global best
//!       is replaced on strict improvement; probabilities are recomputed
//!    b. evaporation, elitist deposit on the global best, recomputation
//! 3. Intensification phase, until its own budget elapses: clone the
//!    global best, run the ant-level local search on the clone, keep it on
//!    strict improvement
//!
//! Budgets are polled between ant constructions and between local-search
//! passes; a unit of work in progress always completes.
//!
//! # Reference
//! Dorigo & Gambardella (1997), "Ant Colony System"

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::ant::Ant;
use super::config::AcsConfig;
use super::desirability::Desirability;
use crate::error::ConfigError;
use crate::instance::FlowShopInstance;

/// The run's single best-solution slot.
///
/// Holds its own copy of the sequence; later mutation of the ant it was
/// taken from never affects it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestSolution {
    /// Job sequence.
    pub permutation: Vec<usize>,
    /// Total weighted tardiness.
    pub objective: f64,
}

impl BestSolution {
    /// An empty slot that any evaluated ant improves on.
    pub fn empty() -> Self {
        Self {
            permutation: Vec::new(),
            objective: f64::INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// Copies `ant` into the slot if it is strictly better.
    pub fn offer(&mut self, ant: &Ant) -> bool {
        if ant.objective() < self.objective {
            self.permutation.clear();
            self.permutation.extend_from_slice(ant.permutation());
            self.objective = ant.objective();
            true
        } else {
            false
        }
    }
}

/// Why the construction phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The construction budget elapsed.
    TimeBudget,
    /// `max_iterations` was reached.
    IterationLimit,
    /// A sequence with zero weighted tardiness was found.
    Optimal,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of one ACS run.
#[derive(Debug, Clone)]
pub struct AcsResult {
    /// Best sequence after both phases.
    pub best: BestSolution,

    /// Best objective at the end of the construction phase.
    pub construction_best: f64,

    /// Completed colony iterations.
    pub iterations: usize,

    /// Ant constructions, including those of a partial last iteration.
    pub constructions: usize,

    /// Local-search passes in the intensification phase.
    pub intensification_passes: usize,

    /// Why the construction phase ended.
    pub stop_reason: StopReason,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best objective at the end of each iteration.
    pub cost_history: Vec<f64>,

    /// Wall-clock time of both phases.
    pub elapsed: Duration,
}

/// One colony bound to an instance: desirability model, ants, global best.
///
/// [`AcsRunner`] drives the two phases in order; they are exposed
/// separately so callers can interleave their own reporting.
pub struct Colony<'a> {
    instance: &'a FlowShopInstance,
    config: &'a AcsConfig,
    model: Desirability,
    ants: Vec<Ant>,
    best: BestSolution,
    rng: StdRng,
    cancel: Option<Arc<AtomicBool>>,
    iterations: usize,
    constructions: usize,
    cost_history: Vec<f64>,
}

impl<'a> Colony<'a> {
    /// Creates a colony with a freshly initialized desirability model.
    pub fn new(instance: &'a FlowShopInstance, config: &'a AcsConfig, rng: StdRng) -> Self {
        Self {
            instance,
            config,
            model: Desirability::new(instance, config),
            ants: (0..config.n_ants).map(|_| Ant::new(instance)).collect(),
            best: BestSolution::empty(),
            rng,
            cancel: None,
            iterations: 0,
            constructions: 0,
            cost_history: Vec::new(),
        }
    }

    /// Attaches a cancellation flag polled alongside the time budgets.
    pub fn with_cancel(mut self, cancel: Option<Arc<AtomicBool>>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs colony iterations until `budget` elapses or another stop
    /// condition holds.
    ///
    /// At least one ant is always constructed, so the global best is
    /// populated when this returns.
    pub fn construct_phase(&mut self, budget: Duration) -> StopReason {
        let start = Instant::now();
        let cancel = self.cancel.clone();
        loop {
            if self.config.max_iterations > 0 && self.iterations >= self.config.max_iterations {
                return StopReason::IterationLimit;
            }

            for ant in &mut self.ants {
                if !self.best.is_empty() {
                    if flag_raised(&cancel) {
                        return StopReason::Cancelled;
                    }
                    if start.elapsed() >= budget {
                        return StopReason::TimeBudget;
                    }
                }
                ant.construct(self.instance, &mut self.model, self.config.q0, &mut self.rng);
                self.constructions += 1;
                if self.best.offer(ant) {
                    log::debug!(
                        "iteration {}: new best {}",
                        self.iterations,
                        self.best.objective
                    );
                }
                self.model.recompute_probability();
            }

            self.model.evaporate();
            self.model
                .elitist_deposit(&self.best.permutation, self.best.objective);
            self.model.recompute_probability();

            self.iterations += 1;
            self.cost_history.push(self.best.objective);

            if self.best.objective <= 0.0 {
                return StopReason::Optimal;
            }
            if start.elapsed() >= budget {
                return StopReason::TimeBudget;
            }
        }
    }

    /// Time-bounded local-search refinement of the global best.
    ///
    /// Returns the number of local-search passes.
    pub fn intensify_phase(&mut self, budget: Duration) -> usize {
        if self.best.is_empty() {
            return 0;
        }
        let start = Instant::now();
        let mut scratch = Ant::new(self.instance);
        let mut passes = 0;

        while start.elapsed() < budget && !self.is_cancelled() && self.best.objective > 0.0 {
            scratch.load(self.instance, &self.best.permutation);
            scratch.local_search(self.instance, self.config.sls_stop, &mut self.rng);
            passes += 1;
            if self.best.offer(&scratch) {
                log::debug!("local search pass {passes}: new best {}", self.best.objective);
            }
        }
        passes
    }

    /// The current global best.
    pub fn best(&self) -> &BestSolution {
        &self.best
    }

    /// The desirability model.
    pub fn model(&self) -> &Desirability {
        &self.model
    }

    fn is_cancelled(&self) -> bool {
        flag_raised(&self.cancel)
    }
}

fn flag_raised(cancel: &Option<Arc<AtomicBool>>) -> bool {
    cancel
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Executes one ACS + local-search run.
pub struct AcsRunner;

impl AcsRunner {
    /// Runs ACS on `instance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use u_flowshop::acs::{AcsConfig, AcsRunner};
    /// use u_flowshop::FlowShopInstance;
    ///
    /// let instance = FlowShopInstance::new(
    ///     vec![vec![3.0, 2.0], vec![2.0, 4.0], vec![4.0, 1.0]],
    ///     vec![5.0, 9.0, 6.0],
    ///     vec![1.0, 2.0, 1.0],
    /// ).unwrap();
    /// let config = AcsConfig::default()
    ///     .with_max_iterations(20)
    ///     .with_intensification_budget(Duration::from_millis(5))
    ///     .with_seed(42);
    ///
    /// let result = AcsRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best.permutation.len(), 3);
    /// ```
    pub fn run(instance: &FlowShopInstance, config: &AcsConfig) -> Result<AcsResult, ConfigError> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs ACS with an optional cancellation token.
    ///
    /// A raised flag ends the current phase after the unit of work in
    /// progress and skips the intensification phase.
    pub fn run_with_cancel(
        instance: &FlowShopInstance,
        config: &AcsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcsResult, ConfigError> {
        config.validate()?;

        let start = Instant::now();
        let rng = create_rng(config.seed);
        let mut colony = Colony::new(instance, config, rng).with_cancel(cancel);

        let stop_reason = colony.construct_phase(config.construction_budget);
        let construction_best = colony.best.objective;
        log::info!(
            "construction finished after {} iterations ({:?}): best {}",
            colony.iterations,
            stop_reason,
            construction_best
        );

        let intensification_passes = colony.intensify_phase(config.intensification_budget);
        log::info!(
            "local search finished after {} passes: best {}",
            intensification_passes,
            colony.best.objective
        );

        let cancelled = colony.is_cancelled();
        Ok(AcsResult {
            best: colony.best,
            construction_best,
            iterations: colony.iterations,
            constructions: colony.constructions,
            intensification_passes,
            stop_reason,
            cancelled,
            cost_history: colony.cost_history,
            elapsed: start.elapsed(),
        })
    }
}

/// Seeded generator, or one seeded from OS entropy.
pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}
