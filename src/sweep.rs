//! Batch runs of the simulator over several initial hawk proportions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::simulation::{SimulationConfig, Trajectory, simulate};

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRun {
    pub initial_hawk_proportion: f64,
    pub trajectory: Trajectory,
}

/// `runs` proportions spread evenly over `[0, 1]`, both ends included.
pub fn even_initials(runs: usize) -> Vec<f64> {
    match runs {
        0 => Vec::new(),
        1 => vec![0.5],
        _ => (0..runs).map(|i| i as f64 / (runs - 1) as f64).collect(),
    }
}

/// `runs` proportions drawn uniformly from `[0, 1]` with a fixed seed.
pub fn random_initials(runs: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..runs).map(|_| rng.random_range(0.0..=1.0)).collect()
}

/// Runs one simulation per initial proportion in parallel. Results keep the
/// order of `initials`; the first invalid run aborts the sweep.
pub fn run(base: &SimulationConfig, initials: &[f64]) -> Result<Vec<SweepRun>> {
    if initials.is_empty() {
        return Err(Error::invalid("sweep.runs", "at least one run is required"));
    }

    let runs = initials
        .par_iter()
        .map(|&initial_hawk_proportion| {
            let config = SimulationConfig {
                initial_hawk_proportion,
                ..base.clone()
            };
            simulate(&config).map(|trajectory| SweepRun {
                initial_hawk_proportion,
                trajectory,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        runs = runs.len(),
        threads = rayon::current_num_threads(),
        "sweep finished"
    );
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_initials_cover_unit_interval() {
        assert!(even_initials(0).is_empty());
        assert_eq!(even_initials(1), vec![0.5]);
        assert_eq!(even_initials(5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn random_initials_are_seeded() {
        let a = random_initials(16, 42);
        let b = random_initials(16, 42);
        assert_eq!(a, b);
        assert_ne!(a, random_initials(16, 43));
        assert!(a.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn parallel_runs_match_individual_simulations() {
        let base = SimulationConfig::default();
        let initials = even_initials(9);
        let runs = run(&base, &initials).unwrap();

        assert_eq!(runs.len(), initials.len());
        for (sweep_run, &initial) in runs.iter().zip(&initials) {
            assert_eq!(sweep_run.initial_hawk_proportion, initial);
            let single = simulate(&SimulationConfig {
                initial_hawk_proportion: initial,
                ..base.clone()
            })
            .unwrap();
            assert_eq!(sweep_run.trajectory, single);
        }
    }

    #[test]
    fn empty_or_invalid_sweeps_fail() {
        let base = SimulationConfig::default();
        assert!(run(&base, &[]).is_err());
        assert!(matches!(
            run(&base, &[0.2, 1.2]),
            Err(Error::InvalidParameter { name: "initial_hawk_proportion", .. })
        ));
    }
}
