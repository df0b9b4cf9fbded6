//! Ant Colony System for weighted-tardiness permutation flow-shop scheduling.
//!
//! Every machine processes the jobs in the same order; the goal is the
//! order minimizing the total weighted tardiness `Σ w_j · max(0, C_j - d_j)`.
//!
//! - [`instance`]: Immutable problem data and the benchmark file loader
//! - [`schedule`]: Completion-time recurrence and objective evaluation
//! - [`acs`]: Colony construction, pheromone updates, local search, and
//!   the run driver
//! - [`results`]: Per-instance result file, one line per run
//!
//! # Architecture
//!
//! The optimizer only reads an instance through [`FlowShopInstance`]'s
//! accessors. File parsing, result files and command-line handling are
//! thin layers around it (see the `pfsp-acs` binary).

pub mod acs;
pub mod error;
pub mod instance;
pub mod results;
pub mod schedule;

pub use error::{ConfigError, Error, InstanceError, Result};
pub use instance::FlowShopInstance;
pub use schedule::{weighted_tardiness, Schedule};
