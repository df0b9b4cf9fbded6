use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{info, LevelFilter};
use u_flowshop::acs::{AcsConfig, RunDriver, SlsStop};
use u_flowshop::results::ResultFile;
use u_flowshop::{ConfigError, Error, FlowShopInstance};

/// Ant Colony System with stochastic local search for the permutation
/// flow-shop problem with total weighted tardiness.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the instance file.
    #[arg(long, default_value = "PFSP_instances/DD_Ta051.txt")]
    instance: PathBuf,

    /// Directory receiving one result file per instance.
    #[arg(long, default_value = "resultsACSSLS")]
    results_dir: PathBuf,

    /// Number of ants built every iteration.
    #[arg(long, default_value_t = 10)]
    ants: usize,

    /// Pheromone exponent.
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,

    /// Heuristic exponent.
    #[arg(long, default_value_t = 2.0)]
    beta: f64,

    /// Evaporation and local decay rate.
    #[arg(long, default_value_t = 0.2)]
    rho: f64,

    /// Exploitation probability of the transition rule.
    #[arg(long, default_value_t = 0.9)]
    q0: f64,

    /// Soft cap on colony iterations per run (0 disables it).
    #[arg(long, default_value_t = 10_000)]
    iterations: usize,

    /// Independent runs.
    #[arg(long, default_value_t = 10)]
    runs: usize,

    /// Base random seed; run r uses seed + r.
    #[arg(long)]
    seed: Option<u64>,

    /// Construction phase budget in seconds.
    #[arg(long, default_value_t = 30.0)]
    construction_secs: f64,

    /// Intensification phase budget in seconds.
    #[arg(long, default_value_t = 15.0)]
    intensification_secs: f64,

    /// Stop the ant-level local search after this many consecutive
    /// non-improving swaps instead of at the first one.
    #[arg(long)]
    sls_stagnation: Option<usize>,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> Result<AcsConfig, ConfigError> {
        let mut config = AcsConfig::default()
            .with_ants(self.ants)
            .with_alpha(self.alpha)
            .with_beta(self.beta)
            .with_rho(self.rho)
            .with_q0(self.q0)
            .with_max_iterations(self.iterations)
            .with_construction_budget(seconds("construction_secs", self.construction_secs)?)
            .with_intensification_budget(seconds(
                "intensification_secs",
                self.intensification_secs,
            )?);
        if let Some(limit) = self.sls_stagnation {
            config = config.with_sls_stop(SlsStop::Stagnation(limit));
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::Negative { name, value })
}

pub fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), Error> {
    let args = Args::parse();

    let level_filter = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level_filter)
        .parse_default_env()
        .init();

    // Everything is validated before the result file is touched.
    let driver = RunDriver::new(args.to_config()?, args.runs)?;
    let instance = FlowShopInstance::from_path(&args.instance)?;
    info!(
        "instance {}: {} jobs, {} machines, {} runs of {} ants",
        args.instance.display(),
        instance.num_jobs(),
        instance.num_machines(),
        driver.runs(),
        driver.config().n_ants
    );

    let results = ResultFile::create(&args.results_dir, &args.instance)?;
    let records = driver.run_each(&instance, |record| {
        info!("best sequence: {:?}", record.best.permutation);
        results.append(record.objective())
    })?;

    let best = records
        .iter()
        .map(|r| r.objective())
        .fold(f64::INFINITY, f64::min);
    info!(
        "{} runs written to {}, best {}",
        records.len(),
        results.path().display(),
        best
    );
    Ok(())
}
