//! Replicator dynamics for the two-strategy Hawk-Dove game.
//!
//! Strategy index 0 is Hawk and index 1 is Dove, both for the rows (own
//! strategy) and the columns (opponent strategy) of the payoff matrix.

use tracing::{debug, trace};

use crate::error::{Error, Result};

pub const HAWK: usize = 0;
pub const DOVE: usize = 1;

/// 2x2 payoff matrix indexed by `[own strategy][opponent strategy]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffMatrix([[f64; 2]; 2]);

impl PayoffMatrix {
    pub fn new(values: [[f64; 2]; 2]) -> Result<Self> {
        if values.iter().flatten().any(|v| !v.is_finite()) {
            return Err(Error::invalid(
                "payoff_matrix",
                format!("entries must be finite, got {values:?}"),
            ));
        }
        Ok(PayoffMatrix(values))
    }

    pub fn rows(&self) -> [[f64; 2]; 2] {
        self.0
    }

    /// Expected payoffs of each strategy against the population mix.
    ///
    /// The hawk branch reads column 0 and the dove branch column 1, both
    /// weighted by the current `[hawk, dove]` mix.
    pub fn payoffs(&self, state: PopulationState) -> Payoffs {
        let PopulationState { hawk, dove } = state;
        let hawk_payoff = hawk * self.0[HAWK][HAWK] + dove * self.0[DOVE][HAWK];
        let dove_payoff = hawk * self.0[HAWK][DOVE] + dove * self.0[DOVE][DOVE];
        Payoffs {
            hawk: hawk_payoff,
            dove: dove_payoff,
            total: hawk * hawk_payoff + dove * dove_payoff,
        }
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        PayoffMatrix([[2.0, 0.0], [3.0, 1.0]])
    }
}

impl TryFrom<Vec<Vec<f64>>> for PayoffMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.len() != 2 || rows.iter().any(|row| row.len() != 2) {
            let shape: Vec<usize> = rows.iter().map(Vec::len).collect();
            return Err(Error::invalid(
                "payoff_matrix",
                format!("expected 2x2 matrix, got rows of lengths {shape:?}"),
            ));
        }
        PayoffMatrix::new([[rows[0][0], rows[0][1]], [rows[1][0], rows[1][1]]])
    }
}

impl From<PayoffMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PayoffMatrix) -> Self {
        matrix.0.iter().map(|row| row.to_vec()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payoffs {
    pub hawk: f64,
    pub dove: f64,
    pub total: f64,
}

/// Current split of the population. Both shares lie in `[0, 1]` but their
/// sum is not renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationState {
    pub hawk: f64,
    pub dove: f64,
}

impl PopulationState {
    pub fn from_hawk(hawk: f64) -> Self {
        PopulationState {
            hawk,
            dove: 1.0 - hawk,
        }
    }

    pub fn mass(&self) -> f64 {
        self.hawk + self.dove
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub payoff_matrix: PayoffMatrix,
    pub mutation_rate: f64,
    pub initial_hawk_proportion: f64,
    pub num_generations: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            payoff_matrix: PayoffMatrix::default(),
            mutation_rate: 0.01,
            initial_hawk_proportion: 0.5,
            num_generations: 100,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        // Re-check entries: the public field can be built without `new`.
        PayoffMatrix::new(self.payoff_matrix.rows())?;

        if !(self.mutation_rate.is_finite() && self.mutation_rate > 0.0) {
            return Err(Error::invalid(
                "mutation_rate",
                format!("must be a finite value > 0, got {}", self.mutation_rate),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_hawk_proportion) {
            return Err(Error::invalid(
                "initial_hawk_proportion",
                format!("must lie in [0, 1], got {}", self.initial_hawk_proportion),
            ));
        }
        if self.num_generations == 0 {
            return Err(Error::invalid("num_generations", "must be at least 1"));
        }
        Ok(())
    }
}

/// Per-generation proportions recorded before each update.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub hawk: Vec<f64>,
    pub dove: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.hawk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hawk.is_empty()
    }

    pub fn generations(&self) -> Vec<f64> {
        (0..self.len()).map(|g| g as f64).collect()
    }
}

/// Advances the population by one generation. Each share is clamped to
/// `[0, 1]` independently.
pub fn step(matrix: &PayoffMatrix, mutation_rate: f64, state: PopulationState) -> PopulationState {
    let payoffs = matrix.payoffs(state);
    let hawk = state.hawk + mutation_rate * (payoffs.hawk - payoffs.total) * state.hawk;
    let dove = state.dove + mutation_rate * (payoffs.dove - payoffs.total) * state.dove;
    PopulationState {
        hawk: hawk.clamp(0.0, 1.0),
        dove: dove.clamp(0.0, 1.0),
    }
}

pub fn simulate(config: &SimulationConfig) -> Result<Trajectory> {
    config.validate()?;

    let generations = config.num_generations;
    let mut hawk = vec![0.0; generations];
    let mut dove = vec![0.0; generations];
    let mut state = PopulationState::from_hawk(config.initial_hawk_proportion);

    for generation in 0..generations {
        hawk[generation] = state.hawk;
        dove[generation] = state.dove;
        state = step(&config.payoff_matrix, config.mutation_rate, state);
        trace!(generation, hawk = state.hawk, dove = state.dove, "generation updated");
    }

    debug!(
        generations,
        initial_hawk = config.initial_hawk_proportion,
        final_hawk = hawk[generations - 1],
        final_dove = dove[generations - 1],
        "simulation finished"
    );

    Ok(Trajectory { hawk, dove })
}
