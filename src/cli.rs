use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Replicator dynamics of the Hawk-Dove game")]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Mutation rate (overrides config)
    #[arg(long)]
    pub mutation_rate: Option<f64>,

    /// Initial hawk proportion in [0, 1] (overrides config)
    #[arg(long)]
    pub initial_hawk: Option<f64>,

    /// Number of generations (overrides config)
    #[arg(long)]
    pub generations: Option<usize>,

    /// Run N simulations over spread-out initial hawk proportions
    #[arg(long, value_name = "N")]
    pub sweep: Option<usize>,

    /// Sample sweep initial proportions from this seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the trajectory instead of opening a chart window
    #[arg(long, default_value_t = false)]
    pub headless: bool,
}

impl Args {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(rate) = self.mutation_rate {
            config.simulation.mutation_rate = rate;
        }
        if let Some(hawk) = self.initial_hawk {
            config.simulation.initial_hawk_proportion = hawk;
        }
        if let Some(generations) = self.generations {
            config.simulation.num_generations = generations;
        }
        if let Some(runs) = self.sweep {
            config.sweep.runs = runs;
        }
        if self.seed.is_some() {
            config.sweep.seed = self.seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_values() {
        let args = Args::try_parse_from([
            "hawk-dove",
            "--mutation-rate",
            "0.02",
            "--initial-hawk",
            "0.1",
            "--generations",
            "30",
            "--sweep",
            "5",
            "--seed",
            "9",
            "--headless",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert!(args.headless);
        assert_eq!(config.simulation.mutation_rate, 0.02);
        assert_eq!(config.simulation.initial_hawk_proportion, 0.1);
        assert_eq!(config.simulation.num_generations, 30);
        assert_eq!(config.sweep.runs, 5);
        assert_eq!(config.sweep.seed, Some(9));
    }

    #[test]
    fn no_flags_leave_config_untouched() {
        let args = Args::try_parse_from(["hawk-dove"]).unwrap();
        let mut config = AppConfig::default();
        config.sweep.seed = Some(3);
        args.apply(&mut config);

        assert!(!args.headless);
        assert_eq!(config.simulation.num_generations, 100);
        assert_eq!(config.sweep.seed, Some(3));
    }
}
