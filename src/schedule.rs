//! Flow-shop schedule evaluation.
//!
//! Given a job permutation, computes the completion-time table with the
//! classic permutation flow-shop recurrence:
//!
//! ```text
//! C[0][0] = p(π0, 0)
//! C[0][k] = C[0][k-1] + p(πk, 0)
//! C[m][0] = C[m-1][0] + p(π0, m)
//! C[m][k] = max(C[m-1][k], C[m][k-1]) + p(πk, m)
//! ```
//!
//! then per-position tardiness `max(0, C[M-1][k] - d(πk))` and the total
//! weighted tardiness `Σ w(πk) · T(k)`.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 6: Flow Shops and Flexible Flow Shops

use crate::instance::FlowShopInstance;

/// Reusable evaluation buffers for one permutation.
///
/// Every call to [`evaluate`](Schedule::evaluate) recomputes all values
/// from scratch but never reallocates once the buffers are sized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    num_jobs: usize,
    num_machines: usize,
    /// Row-major `num_machines x num_jobs`, indexed by (machine, position).
    completion: Vec<f64>,
    /// Indexed by position.
    tardiness: Vec<f64>,
    total_weighted_tardiness: f64,
}

impl Schedule {
    /// Creates buffers sized for `instance`.
    pub fn new(instance: &FlowShopInstance) -> Self {
        let n = instance.num_jobs();
        let m = instance.num_machines();
        Self {
            num_jobs: n,
            num_machines: m,
            completion: vec![0.0; n * m],
            tardiness: vec![0.0; n],
            total_weighted_tardiness: 0.0,
        }
    }

    /// Evaluates `permutation` and returns its total weighted tardiness.
    ///
    /// # Panics
    /// Panics if `permutation.len()` differs from the instance's job count.
    pub fn evaluate(&mut self, instance: &FlowShopInstance, permutation: &[usize]) -> f64 {
        let n = instance.num_jobs();
        let m = instance.num_machines();
        assert_eq!(
            permutation.len(),
            n,
            "permutation length must equal the number of jobs"
        );
        if self.num_jobs != n || self.num_machines != m {
            *self = Self::new(instance);
        }

        // Machine 0: no waiting, pure prefix sum.
        let mut time = 0.0;
        for (pos, &job) in permutation.iter().enumerate() {
            time += instance.processing_time(job, 0);
            self.completion[pos] = time;
        }

        for machine in 1..m {
            let (prev, row) = self.completion[(machine - 1) * n..(machine + 1) * n].split_at_mut(n);
            let mut finished = 0.0;
            for (pos, &job) in permutation.iter().enumerate() {
                let start = if pos == 0 {
                    prev[0]
                } else {
                    prev[pos].max(finished)
                };
                finished = start + instance.processing_time(job, machine);
                row[pos] = finished;
            }
        }

        let last = (m - 1) * n;
        let mut total = 0.0;
        for (pos, &job) in permutation.iter().enumerate() {
            let tardy = (self.completion[last + pos] - instance.due_date(job)).max(0.0);
            self.tardiness[pos] = tardy;
            total += tardy * instance.weight(job);
        }
        self.total_weighted_tardiness = total;
        total
    }

    /// Total weighted tardiness from the last evaluation.
    #[inline]
    pub fn total_weighted_tardiness(&self) -> f64 {
        self.total_weighted_tardiness
    }

    /// Completion time of the job at `position` on `machine`.
    #[inline]
    pub fn completion_time(&self, machine: usize, position: usize) -> f64 {
        self.completion[machine * self.num_jobs + position]
    }

    /// Completion times on the last machine, by position.
    pub fn completion_times(&self) -> &[f64] {
        let last = self.num_machines.saturating_sub(1) * self.num_jobs;
        &self.completion[last..last + self.num_jobs]
    }

    /// Tardiness by position.
    pub fn tardiness(&self) -> &[f64] {
        &self.tardiness
    }

    /// Completion time of the last job on the last machine.
    pub fn makespan(&self) -> f64 {
        self.completion_times().last().copied().unwrap_or(0.0)
    }
}

/// One-shot evaluation of a permutation's total weighted tardiness.
pub fn weighted_tardiness(instance: &FlowShopInstance, permutation: &[usize]) -> f64 {
    Schedule::new(instance).evaluate(instance, permutation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single_machine() -> FlowShopInstance {
        FlowShopInstance::new(
            vec![vec![3.0], vec![2.0], vec![4.0]],
            vec![5.0, 5.0, 5.0],
            vec![1.0, 1.0, 1.0],
        )
        .unwrap()
    }

    fn two_machines() -> FlowShopInstance {
        FlowShopInstance::new(
            vec![vec![3.0, 1.0], vec![2.0, 5.0], vec![4.0, 2.0]],
            vec![4.0, 8.0, 6.0],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_identity_order_single_machine() {
        let instance = single_machine();
        let mut schedule = Schedule::new(&instance);
        let wt = schedule.evaluate(&instance, &[0, 1, 2]);

        assert_eq!(schedule.completion_times(), &[3.0, 5.0, 9.0]);
        assert_eq!(schedule.tardiness(), &[0.0, 0.0, 4.0]);
        assert_eq!(wt, 4.0);
    }

    #[test]
    fn test_reordering_changes_objective() {
        let instance = single_machine();
        let mut schedule = Schedule::new(&instance);
        let wt = schedule.evaluate(&instance, &[2, 0, 1]);

        assert_eq!(schedule.completion_times(), &[4.0, 7.0, 9.0]);
        assert_eq!(schedule.tardiness(), &[0.0, 2.0, 4.0]);
        assert_eq!(wt, 6.0);
        assert_eq!(schedule.total_weighted_tardiness(), 6.0);
    }

    #[test]
    fn test_two_machine_recurrence() {
        let instance = two_machines();
        let mut schedule = Schedule::new(&instance);
        let wt = schedule.evaluate(&instance, &[0, 1, 2]);

        // Machine 0: 3, 5, 9
        assert_eq!(schedule.completion_time(0, 0), 3.0);
        assert_eq!(schedule.completion_time(0, 1), 5.0);
        assert_eq!(schedule.completion_time(0, 2), 9.0);
        // Machine 1: 3+1=4, max(5,4)+5=10, max(9,10)+2=12
        assert_eq!(schedule.completion_times(), &[4.0, 10.0, 12.0]);
        assert_eq!(schedule.tardiness(), &[0.0, 2.0, 6.0]);
        assert_eq!(wt, 2.0 * 2.0 + 6.0 * 3.0);
        assert_eq!(schedule.makespan(), 12.0);
    }

    #[test]
    fn test_buffers_reused_across_calls() {
        let instance = two_machines();
        let mut schedule = Schedule::new(&instance);
        let first = schedule.evaluate(&instance, &[2, 1, 0]);
        let _ = schedule.evaluate(&instance, &[0, 1, 2]);
        let again = schedule.evaluate(&instance, &[2, 1, 0]);
        assert_eq!(first, again);
    }

    #[test]
    fn test_default_schedule_resizes() {
        let instance = two_machines();
        let mut schedule = Schedule::default();
        let wt = schedule.evaluate(&instance, &[0, 1, 2]);
        assert_eq!(wt, weighted_tardiness(&instance, &[0, 1, 2]));
    }

    #[test]
    #[should_panic(expected = "permutation length must equal the number of jobs")]
    fn test_wrong_length_panics() {
        let instance = single_machine();
        Schedule::new(&instance).evaluate(&instance, &[0, 1]);
    }

    fn instance_and_permutation() -> impl Strategy<Value = (FlowShopInstance, Vec<usize>)> {
        (1usize..8, 1usize..5).prop_flat_map(|(n, m)| {
            (
                prop::collection::vec(prop::collection::vec(0u32..50, m), n),
                prop::collection::vec(-20i32..200, n),
                prop::collection::vec(0u32..10, n),
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
            )
                .prop_map(|(p, d, w, perm)| {
                    let instance = FlowShopInstance::new(
                        p.into_iter()
                            .map(|row| row.into_iter().map(f64::from).collect())
                            .collect(),
                        d.into_iter().map(f64::from).collect(),
                        w.into_iter().map(f64::from).collect(),
                    )
                    .unwrap();
                    (instance, perm)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_evaluation_is_deterministic((instance, perm) in instance_and_permutation()) {
            let mut a = Schedule::new(&instance);
            let mut b = Schedule::new(&instance);
            let wa = a.evaluate(&instance, &perm);
            let wb = b.evaluate(&instance, &perm);
            prop_assert_eq!(wa, wb);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_completion_is_monotone((instance, perm) in instance_and_permutation()) {
            let mut s = Schedule::new(&instance);
            s.evaluate(&instance, &perm);
            for m in 0..instance.num_machines() {
                for k in 0..instance.num_jobs() {
                    if m > 0 {
                        prop_assert!(s.completion_time(m, k) >= s.completion_time(m - 1, k));
                    }
                    if k > 0 {
                        prop_assert!(s.completion_time(m, k) >= s.completion_time(m, k - 1));
                    }
                }
            }
        }

        #[test]
        fn prop_tardiness_non_negative((instance, perm) in instance_and_permutation()) {
            let mut s = Schedule::new(&instance);
            let total = s.evaluate(&instance, &perm);
            prop_assert!(s.tardiness().iter().all(|&t| t >= 0.0));
            prop_assert!(total >= 0.0);
        }
    }
}
