//! Per-instance result file: a header line, then one objective per run.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Header written when the file is created.
pub const HEADER: &str = "Total weighted tardiness";

/// Result file keyed by instance name.
#[derive(Debug, Clone)]
pub struct ResultFile {
    path: PathBuf,
}

impl ResultFile {
    /// Creates (or truncates) `<dir>/<instance file name>` and writes the
    /// header. Missing directories are created.
    pub fn create(dir: impl AsRef<Path>, instance_path: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let name = instance_path
            .as_ref()
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "instance".into());
        let path = dir.join(name);

        fs::create_dir_all(dir).map_err(|source| Error::Results {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut file = File::create(&path).map_err(|source| Error::Results {
            path: path.clone(),
            source,
        })?;
        writeln!(file, "{HEADER}").map_err(|source| Error::Results {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    /// Appends one run's best objective on its own line.
    pub fn append(&self, objective: f64) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{objective}").map(|_| f))
            .map_err(|source| Error::Results {
                path: self.path.clone(),
                source,
            })?;
        file.flush().map_err(|source| Error::Results {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("u-flowshop-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_create_writes_header() {
        let dir = scratch_dir("header");
        let file = ResultFile::create(&dir, "instances/DD_Ta051.txt").unwrap();
        assert_eq!(file.path(), dir.join("DD_Ta051.txt"));
        let text = fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, format!("{HEADER}\n"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_append_one_line_per_run() {
        let dir = scratch_dir("append");
        let file = ResultFile::create(&dir, "DD_Ta052.txt").unwrap();
        file.append(1234.0).unwrap();
        file.append(987.5).unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, format!("{HEADER}\n1234\n987.5\n"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_create_truncates() {
        let dir = scratch_dir("truncate");
        let file = ResultFile::create(&dir, "x.txt").unwrap();
        file.append(1.0).unwrap();
        let file = ResultFile::create(&dir, "x.txt").unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, format!("{HEADER}\n"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
