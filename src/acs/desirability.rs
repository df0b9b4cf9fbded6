//! Pheromone, heuristic and selection-probability matrices.
//!
//! All three matrices are square `N x N` and indexed by (job, position):
//! the pheromone on `(j, t)` is the learned desirability of placing job `j`
//! at position `t` of the sequence.
//!
//! # Update rules
//!
//! | Operation | Formula |
//! |-----------|---------|
//! | evaporation | `τ ← (1-ρ)·τ` on every cell |
//! | local decay | `τ ← (1-ρ)·τ + ρ·τ0` on one cell |
//! | elitist deposit | `τ[π(t)][t] ← τ + ρ·(k/f*)·scale` on the best sequence |
//! | probability | `p = τ^α · η^β` |
//!
//! # Reference
//! Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative Learning
//! Approach to the Traveling Salesman Problem"

use crate::instance::FlowShopInstance;

use super::config::AcsConfig;

/// Per-run desirability state shared by all ants of a colony.
#[derive(Debug, Clone, PartialEq)]
pub struct Desirability {
    n: usize,
    alpha: f64,
    beta: f64,
    rho: f64,
    tau0: f64,
    heuristic_constant: f64,
    deposit_constant: f64,
    deposit_scale: f64,
    pheromone: Vec<f64>,
    heuristic: Vec<f64>,
    /// `heuristic^beta`, fixed for the whole run.
    heuristic_beta: Vec<f64>,
    probability: Vec<f64>,
}

impl Desirability {
    /// Creates and initializes the model for `instance`.
    ///
    /// Pheromone starts at `τ0` everywhere. The heuristic is the urgency
    /// proxy `c / max(1, due_date)`, identical for every position.
    pub fn new(instance: &FlowShopInstance, config: &AcsConfig) -> Self {
        let n = instance.num_jobs();
        let mut model = Self {
            n,
            alpha: config.alpha,
            beta: config.beta,
            rho: config.rho,
            tau0: config.initial_pheromone,
            heuristic_constant: config.heuristic_constant,
            deposit_constant: config.deposit_constant,
            deposit_scale: config.deposit_scale,
            pheromone: Vec::new(),
            heuristic: Vec::new(),
            heuristic_beta: Vec::new(),
            probability: Vec::new(),
        };
        model.initialize(instance);
        model
    }

    /// Resets every matrix to its initial state.
    pub fn initialize(&mut self, instance: &FlowShopInstance) {
        let n = self.n;
        self.pheromone = vec![self.tau0; n * n];

        self.heuristic = Vec::with_capacity(n * n);
        for job in 0..n {
            let due = instance.due_date(job).max(1.0);
            let eta = self.heuristic_constant / due;
            self.heuristic.extend(std::iter::repeat(eta).take(n));
        }
        self.heuristic_beta = self.heuristic.iter().map(|h| h.powf(self.beta)).collect();

        self.probability = vec![0.0; n * n];
        self.recompute_probability();
    }

    /// Recomputes `probability = pheromone^alpha * heuristic^beta`.
    pub fn recompute_probability(&mut self) {
        let alpha = self.alpha;
        for ((p, tau), eta_beta) in self
            .probability
            .iter_mut()
            .zip(&self.pheromone)
            .zip(&self.heuristic_beta)
        {
            *p = tau.powf(alpha) * eta_beta;
        }
    }

    /// Global evaporation: every cell shrinks by `(1 - rho)`.
    pub fn evaporate(&mut self) {
        let keep = 1.0 - self.rho;
        for tau in &mut self.pheromone {
            *tau *= keep;
        }
    }

    /// ACS local update after an ant places `job` at `position`.
    ///
    /// Pulls the cell back towards `τ0`, making the same placement less
    /// attractive to the remaining ants of the iteration.
    #[inline]
    pub fn local_decay(&mut self, job: usize, position: usize) {
        let idx = self.index(job, position);
        self.pheromone[idx] = (1.0 - self.rho) * self.pheromone[idx] + self.rho * self.tau0;
    }

    /// Reinforces the (job, position) pairs of the best sequence.
    ///
    /// `delta = k / best_objective`; a zero objective (a schedule with no
    /// tardiness at all) uses `delta = k`.
    pub fn elitist_deposit(&mut self, best_permutation: &[usize], best_objective: f64) {
        let delta = if best_objective > 0.0 {
            self.deposit_constant / best_objective
        } else {
            self.deposit_constant
        };
        let amount = self.rho * delta * self.deposit_scale;
        for (position, &job) in best_permutation.iter().enumerate() {
            let idx = self.index(job, position);
            self.pheromone[idx] += amount;
        }
    }

    /// Score used by the exploitation branch: `τ · η^β`.
    #[inline]
    pub fn exploitation_score(&self, job: usize, position: usize) -> f64 {
        let idx = self.index(job, position);
        self.pheromone[idx] * self.heuristic_beta[idx]
    }

    #[inline]
    pub fn pheromone(&self, job: usize, position: usize) -> f64 {
        self.pheromone[self.index(job, position)]
    }

    #[inline]
    pub fn heuristic(&self, job: usize, position: usize) -> f64 {
        self.heuristic[self.index(job, position)]
    }

    #[inline]
    pub fn probability(&self, job: usize, position: usize) -> f64 {
        self.probability[self.index(job, position)]
    }

    /// Matrix dimension (number of jobs).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Initial pheromone level.
    pub fn initial_pheromone(&self) -> f64 {
        self.tau0
    }

    #[inline]
    fn index(&self, job: usize, position: usize) -> usize {
        job * self.n + position
    }
}
