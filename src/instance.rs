//! Permutation flow-shop instance with due dates and weights.
//!
//! The engine only reads an instance through the accessors on
//! [`FlowShopInstance`]; the text loader lives here as well but nothing in
//! the optimizer depends on the on-disk layout.
//!
//! # File format
//!
//! ```text
//! N M
//! 0 p00 1 p01 ... (M-1) p0(M-1)      <- one row per job, machine/time pairs
//! ...
//! Reldue
//! -1 due0 -1 weight0                 <- one row per job
//! ...
//! ```
//!
//! The duration of machine `m` sits in column `2*m + 1` of a job row.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::InstanceError;

/// Immutable weighted-tardiness flow-shop instance.
///
/// # Examples
///
/// ```
/// use u_flowshop::FlowShopInstance;
///
/// let instance = FlowShopInstance::new(
///     vec![vec![3.0], vec![2.0], vec![4.0]],
///     vec![5.0, 5.0, 5.0],
///     vec![1.0, 1.0, 1.0],
/// ).unwrap();
/// assert_eq!(instance.num_jobs(), 3);
/// assert_eq!(instance.num_machines(), 1);
/// assert_eq!(instance.processing_time(2, 0), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowShopInstance {
    num_jobs: usize,
    num_machines: usize,
    /// Row-major `num_jobs x num_machines`.
    processing_times: Vec<f64>,
    due_dates: Vec<f64>,
    weights: Vec<f64>,
}

impl FlowShopInstance {
    /// Builds an instance from a per-job processing-time table.
    ///
    /// `processing_times[job][machine]` must be a rectangular table with at
    /// least one job and one machine. Durations and weights must be finite
    /// and non-negative; due dates must be finite.
    pub fn new(
        processing_times: Vec<Vec<f64>>,
        due_dates: Vec<f64>,
        weights: Vec<f64>,
    ) -> Result<Self, InstanceError> {
        let num_jobs = processing_times.len();
        let num_machines = processing_times.first().map_or(0, Vec::len);
        if num_jobs == 0 || num_machines == 0 {
            return Err(InstanceError::Empty {
                jobs: num_jobs,
                machines: num_machines,
            });
        }

        let mut flat = Vec::with_capacity(num_jobs * num_machines);
        for (job, row) in processing_times.into_iter().enumerate() {
            if row.len() != num_machines {
                return Err(InstanceError::Shape {
                    what: "processing times",
                    expected: num_machines,
                    actual: row.len(),
                });
            }
            for &p in &row {
                if !p.is_finite() || p < 0.0 {
                    return Err(InstanceError::Value {
                        what: "processing time",
                        job,
                        value: p,
                    });
                }
            }
            flat.extend(row);
        }

        if due_dates.len() != num_jobs {
            return Err(InstanceError::Shape {
                what: "due dates",
                expected: num_jobs,
                actual: due_dates.len(),
            });
        }
        if weights.len() != num_jobs {
            return Err(InstanceError::Shape {
                what: "weights",
                expected: num_jobs,
                actual: weights.len(),
            });
        }
        if let Some((job, &d)) = due_dates.iter().enumerate().find(|(_, d)| !d.is_finite()) {
            return Err(InstanceError::Value {
                what: "due date",
                job,
                value: d,
            });
        }
        if let Some((job, &w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(InstanceError::Value {
                what: "weight",
                job,
                value: w,
            });
        }

        Ok(Self {
            num_jobs,
            num_machines,
            processing_times: flat,
            due_dates,
            weights,
        })
    }

    /// Loads an instance file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file))
    }

    /// Parses an instance from text (see the module docs for the layout).
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, InstanceError> {
        let mut lines = Lines::new(reader);

        let (line, header) = lines.next_tokens()?.ok_or_else(|| {
            InstanceError::parse(0, "missing header with job and machine counts")
        })?;
        if header.len() < 2 {
            return Err(InstanceError::parse(line, "header needs job and machine counts"));
        }
        let num_jobs = parse_count(line, &header[0])?;
        let num_machines = parse_count(line, &header[1])?;

        let mut processing_times = Vec::with_capacity(num_jobs);
        for job in 0..num_jobs {
            let (line, row) = lines
                .next_tokens()?
                .ok_or_else(|| InstanceError::parse(line, format!("missing row for job {job}")))?;
            if row.len() < 2 * num_machines {
                return Err(InstanceError::parse(
                    line,
                    format!(
                        "job {job} has {} columns, expected {}",
                        row.len(),
                        2 * num_machines
                    ),
                ));
            }
            let times = (0..num_machines)
                .map(|m| parse_value(line, &row[2 * m + 1]))
                .collect::<Result<Vec<_>, _>>()?;
            processing_times.push(times);
        }

        let (line, keyword) = lines
            .next_tokens()?
            .ok_or_else(|| InstanceError::parse(0, "missing Reldue section"))?;
        if keyword.first().map(String::as_str) != Some("Reldue") {
            return Err(InstanceError::parse(line, "expected `Reldue`"));
        }

        let mut due_dates = Vec::with_capacity(num_jobs);
        let mut weights = Vec::with_capacity(num_jobs);
        for job in 0..num_jobs {
            let (line, row) = lines.next_tokens()?.ok_or_else(|| {
                InstanceError::parse(line, format!("missing due date row for job {job}"))
            })?;
            if row.len() < 4 {
                return Err(InstanceError::parse(
                    line,
                    format!("due date row for job {job} needs 4 columns"),
                ));
            }
            due_dates.push(parse_value(line, &row[1])?);
            weights.push(parse_value(line, &row[3])?);
        }

        Self::new(processing_times, due_dates, weights)
    }

    /// Number of jobs `N`.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.num_jobs
    }

    /// Number of machines `M`.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Duration of `job` on `machine`.
    #[inline]
    pub fn processing_time(&self, job: usize, machine: usize) -> f64 {
        self.processing_times[job * self.num_machines + machine]
    }

    #[inline]
    pub fn due_date(&self, job: usize) -> f64 {
        self.due_dates[job]
    }

    #[inline]
    pub fn weight(&self, job: usize) -> f64 {
        self.weights[job]
    }

    pub fn due_dates(&self) -> &[f64] {
        &self.due_dates
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Non-empty line iterator that tracks 1-based line numbers.
struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line: 0,
        }
    }

    fn next_tokens(&mut self) -> Result<Option<(usize, Vec<String>)>, InstanceError> {
        for text in self.inner.by_ref() {
            let text = text?;
            self.line += 1;
            let tokens: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
            if !tokens.is_empty() {
                return Ok(Some((self.line, tokens)));
            }
        }
        Ok(None)
    }
}

fn parse_count(line: usize, token: &str) -> Result<usize, InstanceError> {
    token
        .parse()
        .map_err(|_| InstanceError::parse(line, format!("`{token}` is not a count")))
}

fn parse_value(line: usize, token: &str) -> Result<f64, InstanceError> {
    token
        .parse()
        .map_err(|_| InstanceError::parse(line, format!("`{token}` is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
3 2
0 3 1 1
0 2 1 5
0 4 1 2
Reldue
-1 5 -1 1
-1 7 -1 2
-1 9 -1 3
";

    #[test]
    fn test_parse_normalizes_machine_columns() {
        let instance = FlowShopInstance::parse(SMALL.as_bytes()).unwrap();
        assert_eq!(instance.num_jobs(), 3);
        assert_eq!(instance.num_machines(), 2);
        assert_eq!(instance.processing_time(0, 0), 3.0);
        assert_eq!(instance.processing_time(0, 1), 1.0);
        assert_eq!(instance.processing_time(1, 1), 5.0);
        assert_eq!(instance.processing_time(2, 0), 4.0);
        assert_eq!(instance.due_dates(), &[5.0, 7.0, 9.0]);
        assert_eq!(instance.weights(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n1 1\n\n0 7\nReldue\n\n-1 3 -1 2\n";
        let instance = FlowShopInstance::parse(text.as_bytes()).unwrap();
        assert_eq!(instance.processing_time(0, 0), 7.0);
        assert_eq!(instance.due_date(0), 3.0);
        assert_eq!(instance.weight(0), 2.0);
    }

    #[test]
    fn test_parse_missing_reldue() {
        let text = "1 1\n0 7\n-1 3 -1 2\n";
        let err = FlowShopInstance::parse(text.as_bytes()).unwrap_err();
        assert!(matches!(err, InstanceError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_parse_short_job_row() {
        let text = "1 2\n0 7\nReldue\n-1 3 -1 2\n";
        let err = FlowShopInstance::parse(text.as_bytes()).unwrap_err();
        assert!(matches!(err, InstanceError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_parse_bad_number() {
        let text = "1 1\n0 x\nReldue\n-1 3 -1 2\n";
        assert!(FlowShopInstance::parse(text.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_truncated_due_dates() {
        let text = "2 1\n0 1\n0 2\nReldue\n-1 3 -1 2\n";
        assert!(FlowShopInstance::parse(text.as_bytes()).is_err());
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = FlowShopInstance::new(vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, InstanceError::Empty { .. }));
    }

    #[test]
    fn test_new_rejects_ragged_table() {
        let err = FlowShopInstance::new(
            vec![vec![1.0, 2.0], vec![3.0]],
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::Shape { .. }));
    }

    #[test]
    fn test_new_rejects_negative_values() {
        assert!(FlowShopInstance::new(vec![vec![-1.0]], vec![0.0], vec![1.0]).is_err());
        assert!(FlowShopInstance::new(vec![vec![1.0]], vec![0.0], vec![-1.0]).is_err());
        assert!(FlowShopInstance::new(vec![vec![1.0]], vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn test_new_allows_negative_due_date() {
        let instance = FlowShopInstance::new(vec![vec![1.0]], vec![-4.0], vec![1.0]).unwrap();
        assert_eq!(instance.due_date(0), -4.0);
    }
}
