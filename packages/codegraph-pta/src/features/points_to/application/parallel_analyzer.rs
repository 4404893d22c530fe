//! Parallel batch analysis
//!
//! Runs independent [`PointerAnalysis`] instances (one per entry point, or one
//! per program) on a dedicated rayon pool. Instances share only the immutable
//! program; each owns its PAG, call graph and context cache.
//!
//! # Example
//! ```rust,ignore
//! let reports = ParallelAnalyzer::new(PtaConfig::default())
//!     .with_threads(4)
//!     .analyze_entry_points(Arc::new(program))?;
//! ```

use super::analyzer::{PointerAnalysis, PtaReport};
use crate::config::PtaConfig;
use crate::errors::{PtaError, Result};
use crate::features::ir::Program;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Parallelization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallelStrategy {
    /// Parallel when there is more than one job
    #[default]
    Auto,
    /// Run jobs one after another on the calling thread
    Sequential,
    /// Always go through the pool
    ForceParallel,
}

/// Report of one entry point analyzed on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryReport {
    pub entry: String,
    pub report: PtaReport,
}

#[derive(Debug, Clone)]
pub struct ParallelAnalyzer {
    config: PtaConfig,
    strategy: ParallelStrategy,
    num_threads: usize,
}

impl ParallelAnalyzer {
    pub fn new(config: PtaConfig) -> Self {
        Self {
            config,
            strategy: ParallelStrategy::Auto,
            num_threads: num_cpus::get(),
        }
    }

    /// Set thread count (overrides auto-detection)
    pub fn with_threads(mut self, count: usize) -> Self {
        self.num_threads = count.max(1);
        self
    }

    pub fn with_strategy(mut self, strategy: ParallelStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn should_use_parallel(&self, jobs: usize) -> bool {
        match self.strategy {
            ParallelStrategy::Sequential => false,
            ParallelStrategy::ForceParallel => true,
            ParallelStrategy::Auto => jobs > 1 && self.num_threads > 1,
        }
    }

    /// Analyze each entry point of `program` as a separate run
    pub fn analyze_entry_points(&self, program: Arc<Program>) -> Result<Vec<EntryReport>> {
        let entries = program.entry_points().to_vec();
        let config = self.config.clone();
        self.run_jobs(entries, move |entry| {
            let name = program
                .method(entry)
                .map(|m| m.signature.to_string())
                .unwrap_or_else(|| format!("m{}", entry));
            let single = program.with_entry_points(&[entry])?;
            let report = analyze_one(single, config.clone())?;
            Ok(EntryReport {
                entry: name,
                report,
            })
        })
    }

    /// Analyze independent programs; reports come back in input order
    pub fn analyze_programs(&self, programs: Vec<Program>) -> Result<Vec<PtaReport>> {
        let config = self.config.clone();
        self.run_jobs(programs, move |program| analyze_one(program, config.clone()))
    }

    fn run_jobs<T, R, F>(&self, jobs: Vec<T>, job: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Send + Sync,
    {
        if !self.should_use_parallel(jobs.len()) {
            return jobs.into_iter().map(job).collect();
        }

        debug!(jobs = jobs.len(), threads = self.num_threads, "parallel batch started");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map_err(|e| PtaError::ThreadPool(e.to_string()))?;
        pool.install(|| jobs.into_par_iter().map(&job).collect())
    }
}

fn analyze_one(program: Program, config: PtaConfig) -> Result<PtaReport> {
    let mut pta = PointerAnalysis::new(program, config)?;
    pta.solve()?;
    Ok(pta.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ir::ProgramBuilder;

    fn two_entries() -> Program {
        let mut pb = ProgramBuilder::new();
        pb.class("A", None, &[]);
        let f = pb.function("f", |b| {
            b.new_object("x", "A");
        });
        let g = pb.function("g", |b| {
            b.new_object("y", "A").assign("z", "y");
        });
        pb.entry(f).entry(g);
        pb.build().unwrap()
    }

    #[test]
    fn test_entry_points_analyzed_separately() {
        let reports = ParallelAnalyzer::new(PtaConfig::default())
            .with_threads(2)
            .analyze_entry_points(Arc::new(two_entries()))
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports[0].entry.contains('f'));
        assert_eq!(reports[0].report.stats.reachable_methods, 1);
        assert_eq!(reports[1].report.points_to.len(), 2);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let program = Arc::new(two_entries());
        let par = ParallelAnalyzer::new(PtaConfig::default())
            .with_threads(2)
            .with_strategy(ParallelStrategy::ForceParallel)
            .analyze_entry_points(Arc::clone(&program))
            .unwrap();
        let seq = ParallelAnalyzer::new(PtaConfig::default())
            .with_strategy(ParallelStrategy::Sequential)
            .analyze_entry_points(program)
            .unwrap();

        let summary = |r: &[EntryReport]| -> Vec<_> {
            r.iter()
                .map(|e| (e.entry.clone(), e.report.points_to.clone()))
                .collect()
        };
        assert_eq!(summary(&par), summary(&seq));
    }

    // ========== EDGE CASES ==========

    #[test]
    fn test_with_threads_floor() {
        let analyzer = ParallelAnalyzer::new(PtaConfig::default()).with_threads(0);
        assert_eq!(analyzer.num_threads(), 1);
        assert!(!analyzer.should_use_parallel(4));
    }

    #[test]
    fn test_invalid_config_surfaces() {
        let config = PtaConfig::default().max_iterations(Some(0));
        let result = ParallelAnalyzer::new(config).analyze_programs(vec![two_entries()]);
        assert!(matches!(result, Err(PtaError::Config(_))));
    }
}
