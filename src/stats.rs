use crate::simulation::{PopulationState, Trajectory};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrajectoryStats {
    pub generations: usize,
    pub final_hawk: f64,
    pub final_dove: f64,
    pub peak_hawk: f64,
    pub peak_hawk_generation: usize,
    /// Largest `|hawk + dove - 1|` seen over the run.
    pub max_mass_drift: f64,
}

impl TrajectoryStats {
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let mut stats = TrajectoryStats {
            generations: trajectory.len(),
            ..Default::default()
        };

        for (generation, (&hawk, &dove)) in trajectory.hawk.iter().zip(&trajectory.dove).enumerate() {
            if generation == 0 || hawk > stats.peak_hawk {
                stats.peak_hawk = hawk;
                stats.peak_hawk_generation = generation;
            }
            let drift = (PopulationState { hawk, dove }.mass() - 1.0).abs();
            stats.max_mass_drift = stats.max_mass_drift.max(drift);
            stats.final_hawk = hawk;
            stats.final_dove = dove;
        }

        stats
    }
}
