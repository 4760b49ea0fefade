//! Batch Orchestrator
//!
//!     Parses a set of Liberty files concurrently and fans the results back
//!     in as one entry per input path. Each worker runs the entire
//!     single-file pipeline synchronously (the file is read into memory up
//!     front, so a parse never blocks on I/O once it starts), and per-file
//!     parses share nothing but the compiled grammar, which is immutable
//!     and lock-free by construction.
//!
//!     Results are keyed by path and returned in input order, so the caller
//!     observes the same mapping no matter how completions interleave or
//!     how many workers ran. One file failing to scan, parse, or even read
//!     never cancels or affects any other file.

use crate::liberty::ast::Library;
use crate::liberty::error::Error;
use crate::liberty::parsing::{parse_with_options, ParseOptions};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Knobs for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker pool size; defaults to the available parallelism.
    pub workers: Option<usize>,
    /// Per-file parse options
    pub parse: ParseOptions,
}

/// Path → result mapping, in input order.
pub type BatchResults = IndexMap<PathBuf, Result<Library, Error>>;

/// Parse every file in `paths` concurrently with default options.
pub fn parse_all<P: AsRef<Path>>(paths: &[P]) -> BatchResults {
    parse_all_with_options(paths, &BatchOptions::default())
}

/// [`parse_all`] with an explicit worker count and parse options.
pub fn parse_all_with_options<P: AsRef<Path>>(
    paths: &[P],
    options: &BatchOptions,
) -> BatchResults {
    let workers = options.workers.unwrap_or_else(default_workers);
    let jobs: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    log::debug!("parsing {} files with {} workers", jobs.len(), workers);

    let run = || {
        jobs.par_iter()
            .map(|path| (path.clone(), parse_file(path, &options.parse)))
            .collect::<Vec<_>>()
    };

    let results = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(run),
        // Pool creation only fails under resource exhaustion; the global
        // pool still bounds concurrency in that case.
        Err(_) => run(),
    };

    results.into_iter().collect()
}

/// Read one file fully, then run the single-file pipeline on it.
fn parse_file(path: &Path, options: &ParseOptions) -> Result<Library, Error> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with_options(&source, options)
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_lib(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write failed");
        path
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = TempDir::new().unwrap();
        let good_a = write_lib(&dir, "a.lib", "library (a) { cell (X) { } }");
        let bad = write_lib(&dir, "b.lib", "library (b) { cell (X) ");
        let good_c = write_lib(&dir, "c.lib", "library (c) { }");
        let paths = vec![good_a.clone(), bad.clone(), good_c.clone()];

        for workers in [1, 4] {
            let options = BatchOptions {
                workers: Some(workers),
                ..BatchOptions::default()
            };
            let results = parse_all_with_options(&paths, &options);

            assert_eq!(results.len(), 3);
            let keys: Vec<_> = results.keys().cloned().collect();
            assert_eq!(keys, paths, "results must keep input order");

            assert_eq!(results[&good_a].as_ref().unwrap().name, "a");
            assert!(matches!(results[&bad], Err(Error::Parse(_))));
            assert_eq!(results[&good_c].as_ref().unwrap().name, "c");
        }
    }

    #[test]
    fn test_batch_reports_missing_file_as_io_error() {
        let dir = TempDir::new().unwrap();
        let present = write_lib(&dir, "here.lib", "library (here) { }");
        let missing = dir.path().join("missing.lib");

        let results = parse_all(&[present.clone(), missing.clone()]);
        assert_eq!(results.len(), 2);
        assert!(results[&present].is_ok());
        assert!(matches!(results[&missing], Err(Error::Io { .. })));
    }

    #[test]
    fn test_batch_scan_error_carries_location() {
        let dir = TempDir::new().unwrap();
        let path = write_lib(&dir, "scan.lib", "library (s) {\n  x : \"oops;\n}");

        let results = parse_all(&[path.clone()]);
        match &results[&path] {
            Err(Error::Scan(err)) => {
                assert_eq!(
                    err.to_string(),
                    "unterminated quoted string starting at 2:7"
                );
            }
            other => panic!("expected scan error, got {other:?}"),
        }
    }
}
