//! Configuration management for the hierarchy builder

use std::path::PathBuf;

/// Default location of generated graph files, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "../Saved/Data/Graph";

/// Settings for one clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Louvain resolution; higher values favor smaller communities
    pub resolution: f64,

    /// Directory receiving the `.igv.json` output
    pub output_dir: PathBuf,

    /// Worker threads, 0 for one per core
    pub threads: usize,

    /// Reject partition sequences whose levels do not nest
    pub check_nesting: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            threads: 0,
            check_nesting: true,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        resolution: f64,
        output_dir: impl Into<PathBuf>,
        threads: usize,
        check_nesting: bool,
    ) -> Self {
        Self {
            resolution,
            output_dir: output_dir.into(),
            threads,
            check_nesting,
        }
    }

    /// Thread count with 0 resolved to the number of available cores
    pub fn effective_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = Config::default();
        assert_eq!(config.resolution, 1.0);
        assert_eq!(config.output_dir, PathBuf::from("../Saved/Data/Graph"));
        assert!(config.check_nesting);
        assert!(config.effective_threads() >= 1);
    }

    #[test]
    fn explicit_threads_are_kept() {
        let config = Config::new(0.5, "out", 3, false);
        assert_eq!(config.effective_threads(), 3);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }
}
