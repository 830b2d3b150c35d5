use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::simulation::{PayoffMatrix, SimulationConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub sweep: SweepSettings,
}

/// Raw simulation options as written in the config file. Shape and range
/// checks happen in [`SimulationSettings::to_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "SimulationSettings::default_payoff_matrix")]
    pub payoff_matrix: Vec<Vec<f64>>,
    #[serde(default = "SimulationSettings::default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "SimulationSettings::default_initial_hawk_proportion")]
    pub initial_hawk_proportion: f64,
    #[serde(default = "SimulationSettings::default_num_generations")]
    pub num_generations: usize,
}

impl SimulationSettings {
    fn default_payoff_matrix() -> Vec<Vec<f64>> {
        PayoffMatrix::default().into()
    }
    fn default_mutation_rate() -> f64 {
        SimulationConfig::default().mutation_rate
    }
    fn default_initial_hawk_proportion() -> f64 {
        SimulationConfig::default().initial_hawk_proportion
    }
    fn default_num_generations() -> usize {
        SimulationConfig::default().num_generations
    }

    pub fn to_config(&self) -> Result<SimulationConfig> {
        let config = SimulationConfig {
            payoff_matrix: PayoffMatrix::try_from(self.payoff_matrix.clone())?,
            mutation_rate: self.mutation_rate,
            initial_hawk_proportion: self.initial_hawk_proportion,
            num_generations: self.num_generations,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            payoff_matrix: Self::default_payoff_matrix(),
            mutation_rate: Self::default_mutation_rate(),
            initial_hawk_proportion: Self::default_initial_hawk_proportion(),
            num_generations: Self::default_num_generations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "ChartSettings::default_title")]
    pub title: String,
    #[serde(default = "ChartSettings::default_x_label")]
    pub x_label: String,
    #[serde(default = "ChartSettings::default_y_label")]
    pub y_label: String,
    #[serde(default = "ChartSettings::default_width")]
    pub width: u32,
    #[serde(default = "ChartSettings::default_height")]
    pub height: u32,
}

impl ChartSettings {
    fn default_title() -> String {
        "Evolution of Hawk-Dove Game".to_string()
    }
    fn default_x_label() -> String {
        "Generations".to_string()
    }
    fn default_y_label() -> String {
        "Proportion of Population".to_string()
    }
    fn default_width() -> u32 {
        800
    }
    fn default_height() -> u32 {
        600
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            x_label: Self::default_x_label(),
            y_label: Self::default_y_label(),
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepSettings {
    /// Number of runs; 0 disables the sweep.
    #[serde(default)]
    pub runs: usize,
    /// Draw initial proportions from this seed instead of spacing them evenly.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "hawk_dove_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn empty_file_yields_reference_run() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.simulation.to_config().unwrap(), SimulationConfig::default());
        assert_eq!(cfg.chart.title, "Evolution of Hawk-Dove Game");
        assert_eq!(cfg.chart.x_label, "Generations");
        assert_eq!(cfg.chart.y_label, "Proportion of Population");
        assert_eq!(cfg.sweep.runs, 0);
        assert_eq!(cfg.sweep.seed, None);
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [simulation]
            mutation_rate = 0.05
            num_generations = 20

            [sweep]
            runs = 4
            seed = 7
            "#,
        )
        .unwrap();
        let sim = cfg.simulation.to_config().unwrap();
        assert_eq!(sim.mutation_rate, 0.05);
        assert_eq!(sim.num_generations, 20);
        assert_eq!(sim.initial_hawk_proportion, 0.5);
        assert_eq!(sim.payoff_matrix, PayoffMatrix::default());
        assert_eq!(cfg.sweep.runs, 4);
        assert_eq!(cfg.sweep.seed, Some(7));
    }

    #[test]
    fn bad_matrix_shape_is_an_invalid_parameter() {
        let cfg = AppConfig::from_toml(
            r#"
            [simulation]
            payoff_matrix = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
            "#,
        )
        .unwrap();
        assert!(matches!(
            cfg.simulation.to_config(),
            Err(Error::InvalidParameter { name: "payoff_matrix", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            AppConfig::from_toml("[simulation\nmutation_rate = "),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing_ones() {
        let path = unique_path("custom.toml");
        let mut custom = AppConfig::default();
        custom.simulation.initial_hawk_proportion = 0.2;
        custom.chart.width = 1024;
        fs::write(&path, toml::to_string_pretty(&custom).unwrap()).unwrap();

        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.simulation.initial_hawk_proportion, 0.2);
        assert_eq!(cfg.chart.width, 1024);
        let _ = fs::remove_file(&path);

        assert!(matches!(AppConfig::load(&path), Err(Error::Io(_))));
    }
}
