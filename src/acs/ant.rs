//! Ant: sequence construction and swap-based local search.
//!
//! # Construction
//!
//! 1. Position 0 takes a uniformly random job.
//! 2. Every later position `t` draws `q ~ U(0, 1)`:
//!    - `q <= q0` (exploitation): the unplaced job maximizing `τ · η^β`
//!      at `t`, first in scan order on ties;
//!    - otherwise (exploration): roulette wheel over the unplaced jobs
//!      weighted by their selection probability at `t`.
//!
//!    Either branch falls back to a uniform choice among the unplaced
//!    jobs when no candidate has positive desirability: exploitation when
//!    every `τ · η^β` is zero, exploration when every selection
//!    probability is zero.
//! 3. Each placement at `t >= 1` immediately applies the local pheromone
//!    decay on `(job, t)`.
//!
//! # Local search
//!
//! Swap two distinct random positions and keep the result only if the
//! total weighted tardiness strictly decreases.

use std::mem;

use rand::Rng;

use super::config::SlsStop;
use super::desirability::Desirability;
use super::roulette;
use crate::instance::FlowShopInstance;
use crate::schedule::Schedule;

/// Counters from one ant-level local search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlsOutcome {
    /// Swap attempts evaluated.
    pub attempts: usize,
    /// Attempts that were kept.
    pub improvements: usize,
}

/// A single ant and its solution.
///
/// Buffers are sized once for the instance and reused by every
/// construction, evaluation and local-search attempt.
#[derive(Debug, Clone)]
pub struct Ant {
    permutation: Vec<usize>,
    placed: Vec<bool>,
    candidates: Vec<usize>,
    weights: Vec<f64>,
    schedule: Schedule,
    /// Evaluation target for swap attempts, exchanged with `schedule` on
    /// acceptance.
    trial: Schedule,
    objective: f64,
}

impl Ant {
    /// Creates an ant with empty buffers for `instance`.
    pub fn new(instance: &FlowShopInstance) -> Self {
        let n = instance.num_jobs();
        Self {
            permutation: Vec::with_capacity(n),
            placed: vec![false; n],
            candidates: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
            schedule: Schedule::new(instance),
            trial: Schedule::new(instance),
            objective: f64::INFINITY,
        }
    }

    /// Builds a complete sequence and evaluates it.
    ///
    /// Mutates `model` through the local decay of every placement after
    /// the first. Returns the total weighted tardiness.
    pub fn construct<R: Rng>(
        &mut self,
        instance: &FlowShopInstance,
        model: &mut Desirability,
        q0: f64,
        rng: &mut R,
    ) -> f64 {
        let n = instance.num_jobs();
        self.permutation.clear();
        self.placed.clear();
        self.placed.resize(n, false);

        let first = roulette::uniform(n, rng);
        self.place(first);

        for position in 1..n {
            let job = self.select_next(model, position, q0, rng);
            self.place(job);
            model.local_decay(job, position);
        }

        self.evaluate(instance)
    }

    /// Replaces the current sequence with `permutation` and evaluates it.
    pub fn load(&mut self, instance: &FlowShopInstance, permutation: &[usize]) -> f64 {
        self.permutation.clear();
        self.permutation.extend_from_slice(permutation);
        self.placed.clear();
        self.placed.resize(instance.num_jobs(), true);
        self.evaluate(instance)
    }

    /// Ant-level stochastic local search on the current sequence.
    ///
    /// With [`SlsStop::FirstUnchanged`] the loop ends as soon as one
    /// attempt leaves the objective where it was, which includes the first
    /// rejected swap.
    pub fn local_search<R: Rng>(
        &mut self,
        instance: &FlowShopInstance,
        stop: SlsStop,
        rng: &mut R,
    ) -> SlsOutcome {
        let mut outcome = SlsOutcome::default();
        let mut unchanged = 0usize;
        loop {
            let before = self.objective;
            outcome.attempts += 1;
            if self.try_swap(instance, rng) {
                outcome.improvements += 1;
            }

            if self.objective == before {
                unchanged += 1;
            } else {
                unchanged = 0;
            }

            let done = match stop {
                SlsStop::FirstUnchanged => unchanged > 0,
                SlsStop::Stagnation(limit) => unchanged >= limit,
            };
            if done {
                return outcome;
            }
        }
    }

    /// One swap move with strict-improvement acceptance.
    ///
    /// Returns `true` if the swap was kept. Sequences shorter than two
    /// jobs have no move and always return `false`.
    pub fn try_swap<R: Rng>(&mut self, instance: &FlowShopInstance, rng: &mut R) -> bool {
        let n = self.permutation.len();
        if n < 2 {
            return false;
        }
        let i = roulette::uniform(n, rng);
        let mut j = roulette::uniform(n - 1, rng);
        if j >= i {
            j += 1;
        }

        self.permutation.swap(i, j);
        let candidate = self.trial.evaluate(instance, &self.permutation);
        if candidate < self.objective {
            mem::swap(&mut self.schedule, &mut self.trial);
            self.objective = candidate;
            true
        } else {
            self.permutation.swap(i, j);
            false
        }
    }

    /// The job sequence, position by position.
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Total weighted tardiness of the current sequence.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Completion times and tardiness of the current sequence.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn place(&mut self, job: usize) {
        self.permutation.push(job);
        self.placed[job] = true;
    }

    fn evaluate(&mut self, instance: &FlowShopInstance) -> f64 {
        self.objective = self.schedule.evaluate(instance, &self.permutation);
        self.objective
    }

    /// State-transition rule for `position`.
    fn select_next<R: Rng>(
        &mut self,
        model: &Desirability,
        position: usize,
        q0: f64,
        rng: &mut R,
    ) -> usize {
        let q: f64 = rng.random();
        if q <= q0 {
            return match self.exploit(model, position) {
                Some(job) => job,
                None => self.any_unplaced(rng),
            };
        }
        self.explore(model, position, rng)
    }

    /// Arg-max of `τ · η^β` over unplaced jobs; `None` if nothing beats zero.
    fn exploit(&self, model: &Desirability, position: usize) -> Option<usize> {
        let mut best = None;
        let mut best_score = 0.0;
        for (job, &placed) in self.placed.iter().enumerate() {
            if placed {
                continue;
            }
            let score = model.exploitation_score(job, position);
            if score > best_score {
                best_score = score;
                best = Some(job);
            }
        }
        best
    }

    /// Random-proportional rule over unplaced jobs.
    fn explore<R: Rng>(&mut self, model: &Desirability, position: usize, rng: &mut R) -> usize {
        self.candidates.clear();
        self.weights.clear();
        for (job, &placed) in self.placed.iter().enumerate() {
            if !placed {
                self.candidates.push(job);
                self.weights.push(model.probability(job, position));
            }
        }
        // Construction never asks for a position beyond the last job.
        let pick = roulette::spin(&self.weights, rng).unwrap_or(0);
        self.candidates[pick]
    }

    /// Uniform choice among unplaced jobs.
    fn any_unplaced<R: Rng>(&mut self, rng: &mut R) -> usize {
        self.candidates.clear();
        self.candidates.extend(
            self.placed
                .iter()
                .enumerate()
                .filter(|&(_, &placed)| !placed)
                .map(|(job, _)| job),
        );
        self.candidates[roulette::uniform(self.candidates.len(), rng)]
    }
}
