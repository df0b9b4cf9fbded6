//! Ant Colony System (ACS) with stochastic local search.
//!
//! A constructive metaheuristic for permutation flow-shop scheduling:
//! ants assign jobs to sequence positions guided by pheromone learned on
//! (job, position) pairs and a due-date heuristic. A swap-based local
//! search then intensifies around the best sequence.
//!
//! # Key Types
//!
//! - [`AcsConfig`]: Algorithm parameters and phase budgets
//! - [`Desirability`]: Pheromone, heuristic and probability matrices
//! - [`Ant`]: Sequence construction and ant-level local search
//! - [`AcsRunner`] / [`Colony`]: One run (construction, then intensification)
//! - [`RunDriver`]: Independent repetitions, one record per run
//!
//! # References
//!
//! - Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative Learning
//!   Approach to the Traveling Salesman Problem"
//! - Stützle (1998), "An Ant Approach to the Flow Shop Problem"
//! - den Besten, Stützle & Dorigo (2000), "Ant Colony Optimization for the
//!   Total Weighted Tardiness Problem"

mod ant;
mod config;
mod desirability;
mod driver;
pub mod roulette;
mod runner;

pub use ant::{Ant, SlsOutcome};
pub use config::{AcsConfig, SlsStop};
pub use desirability::Desirability;
pub use driver::{RunDriver, RunRecord};
pub use runner::{AcsResult, AcsRunner, BestSolution, Colony, StopReason};
