use std::fs;
use std::time::Duration;

use u_flowshop::acs::{AcsConfig, RunDriver, StopReason};
use u_flowshop::results::{ResultFile, HEADER};
use u_flowshop::{weighted_tardiness, FlowShopInstance, Schedule};

const INSTANCE: &str = "\
8 3
0 5 1 3 2 6
0 2 1 7 2 2
0 8 1 1 2 4
0 3 1 4 2 5
0 6 1 2 2 3
0 1 1 5 2 7
0 4 1 6 2 1
0 7 1 2 2 2
Reldue
-1 20 -1 3
-1 15 -1 1
-1 40 -1 2
-1 18 -1 4
-1 30 -1 1
-1 12 -1 2
-1 25 -1 3
-1 35 -1 1
";

#[test]
fn single_machine_scenarios() {
    let instance = FlowShopInstance::new(
        vec![vec![3.0], vec![2.0], vec![4.0]],
        vec![5.0, 5.0, 5.0],
        vec![1.0, 1.0, 1.0],
    )
    .unwrap();
    let mut schedule = Schedule::new(&instance);

    assert_eq!(schedule.evaluate(&instance, &[0, 1, 2]), 4.0);
    assert_eq!(schedule.completion_times(), &[3.0, 5.0, 9.0]);
    assert_eq!(schedule.tardiness(), &[0.0, 0.0, 4.0]);

    assert_eq!(schedule.evaluate(&instance, &[2, 0, 1]), 6.0);
    assert_eq!(schedule.completion_times(), &[4.0, 7.0, 9.0]);
    assert_eq!(schedule.tardiness(), &[0.0, 2.0, 4.0]);
}

#[test]
fn parse_optimize_and_record() {
    let instance = FlowShopInstance::parse(INSTANCE.as_bytes()).unwrap();
    assert_eq!(instance.num_jobs(), 8);
    assert_eq!(instance.num_machines(), 3);
    assert_eq!(instance.processing_time(2, 1), 1.0);

    let config = AcsConfig::default()
        .with_max_iterations(25)
        .with_intensification_budget(Duration::from_millis(20))
        .with_seed(2024);
    let driver = RunDriver::new(config, 3).unwrap();

    let dir = std::env::temp_dir().join(format!("u-flowshop-pipeline-{}", std::process::id()));
    let results = ResultFile::create(&dir, "DD_small.txt").unwrap();
    let records = driver
        .run_each(&instance, |record| results.append(record.objective()))
        .unwrap();

    assert_eq!(records.len(), 3);
    let identity: Vec<usize> = (0..8).collect();
    let identity_wt = weighted_tardiness(&instance, &identity);
    for record in &records {
        let mut sorted = record.best.permutation.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, identity);
        assert_eq!(
            record.objective(),
            weighted_tardiness(&instance, &record.best.permutation)
        );
        assert!(matches!(
            record.stop_reason,
            StopReason::IterationLimit | StopReason::Optimal
        ));
        // 250 constructions on 8 jobs should not lose to an arbitrary order.
        assert!(record.objective() <= identity_wt);
    }

    let text = fs::read_to_string(results.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len(), 4);
    for (line, record) in lines[1..].iter().zip(&records) {
        assert_eq!(line.parse::<f64>().unwrap(), record.objective());
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_configuration_fails_before_running() {
    let config = AcsConfig::default().with_rho(-0.5);
    assert!(RunDriver::new(config, 1).is_err());
}
