//! Independent repetitions of the ACS run.
//!
//! Each run gets a freshly initialized desirability model and its own
//! random stream: with a base seed `s`, run `r` is seeded with `s + r`.

use std::time::Duration;

use super::config::AcsConfig;
use super::runner::{AcsRunner, BestSolution, StopReason};
use crate::error::ConfigError;
use crate::instance::FlowShopInstance;

/// Outcome of one independent run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    /// Zero-based run index.
    pub run: usize,
    /// Seed used for this run, if the base configuration had one.
    pub seed: Option<u64>,
    /// Best sequence and its total weighted tardiness.
    pub best: BestSolution,
    /// Best objective before the intensification phase.
    pub construction_best: f64,
    /// Completed colony iterations.
    pub iterations: usize,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl RunRecord {
    /// Total weighted tardiness of the run's best sequence.
    pub fn objective(&self) -> f64 {
        self.best.objective
    }
}

/// Repeats [`AcsRunner`] for a fixed number of independent runs.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_flowshop::acs::{AcsConfig, RunDriver};
/// use u_flowshop::FlowShopInstance;
///
/// let instance = FlowShopInstance::new(
///     vec![vec![3.0], vec![2.0], vec![4.0]],
///     vec![5.0, 5.0, 5.0],
///     vec![1.0, 1.0, 1.0],
/// ).unwrap();
/// let config = AcsConfig::default()
///     .with_max_iterations(5)
///     .with_intensification_budget(Duration::ZERO)
///     .with_seed(1);
///
/// let records = RunDriver::new(config, 3).unwrap().run(&instance).unwrap();
/// assert_eq!(records.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RunDriver {
    config: AcsConfig,
    runs: usize,
}

impl RunDriver {
    /// Validates `config` and `runs` up front, before any run starts.
    pub fn new(config: AcsConfig, runs: usize) -> Result<Self, ConfigError> {
        config.validate()?;
        if runs == 0 {
            return Err(ConfigError::NoRuns);
        }
        Ok(Self { config, runs })
    }

    pub fn config(&self) -> &AcsConfig {
        &self.config
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Seed of run `run`, derived from the base seed.
    pub fn run_seed(&self, run: usize) -> Option<u64> {
        self.config.seed.map(|s| s.wrapping_add(run as u64))
    }

    /// Executes every run and collects the records.
    pub fn run(&self, instance: &FlowShopInstance) -> Result<Vec<RunRecord>, ConfigError> {
        self.run_each(instance, |_| Ok::<(), ConfigError>(()))
    }

    /// Executes every run, handing each record to `on_run` as soon as the
    /// run finishes.
    ///
    /// An error from `on_run` aborts the remaining runs.
    pub fn run_each<F, E>(&self, instance: &FlowShopInstance, mut on_run: F) -> Result<Vec<RunRecord>, E>
    where
        F: FnMut(&RunRecord) -> Result<(), E>,
        E: From<ConfigError>,
    {
        let mut records = Vec::with_capacity(self.runs);
        for run in 0..self.runs {
            let mut config = self.config.clone();
            config.seed = self.run_seed(run);
            log::info!("run {}/{} started (seed {:?})", run + 1, self.runs, config.seed);

            let result = AcsRunner::run(instance, &config)?;
            let record = RunRecord {
                run,
                seed: config.seed,
                best: result.best,
                construction_best: result.construction_best,
                iterations: result.iterations,
                stop_reason: result.stop_reason,
                elapsed: result.elapsed,
            };
            log::info!(
                "run {}/{} finished: best weighted tardiness {}",
                run + 1,
                self.runs,
                record.objective()
            );

            on_run(&record)?;
            records.push(record);
        }
        Ok(records)
    }
}
