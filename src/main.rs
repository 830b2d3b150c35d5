use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use hawk_dove::chart::{self, Chart};
use hawk_dove::cli::Args;
use hawk_dove::config::AppConfig;
use hawk_dove::error::Result;
use hawk_dove::simulation::{Trajectory, simulate};
use hawk_dove::stats::TrajectoryStats;
use hawk_dove::sweep;

fn main() -> ExitCode {
    init_tracing();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "hawk-dove failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);
    let simulation = config.simulation.to_config()?;

    if config.sweep.runs > 0 {
        let initials = match config.sweep.seed {
            Some(seed) => sweep::random_initials(config.sweep.runs, seed),
            None => sweep::even_initials(config.sweep.runs),
        };
        let runs = sweep::run(&simulation, &initials)?;
        for run in &runs {
            log_stats(run.initial_hawk_proportion, &run.trajectory);
        }
        if args.headless {
            for run in &runs {
                println!("# h0 = {:.4}", run.initial_hawk_proportion);
                print_table(&run.trajectory);
            }
            return Ok(());
        }
        return chart::show(&Chart::sweep(&runs, &config.chart), &config.chart);
    }

    let trajectory = simulate(&simulation)?;
    log_stats(simulation.initial_hawk_proportion, &trajectory);
    if args.headless {
        print_table(&trajectory);
        return Ok(());
    }
    chart::show(&Chart::hawk_dove(&trajectory, &config.chart), &config.chart)
}

fn log_stats(initial_hawk: f64, trajectory: &Trajectory) {
    let stats = TrajectoryStats::from_trajectory(trajectory);
    info!(
        initial_hawk,
        generations = stats.generations,
        final_hawk = stats.final_hawk,
        final_dove = stats.final_dove,
        peak_hawk = stats.peak_hawk,
        peak_hawk_generation = stats.peak_hawk_generation,
        max_mass_drift = stats.max_mass_drift,
        "trajectory summary"
    );
}

fn print_table(trajectory: &Trajectory) {
    println!("generation\thawk\tdove");
    for (generation, (hawk, dove)) in trajectory.hawk.iter().zip(&trajectory.dove).enumerate() {
        println!("{generation}\t{hawk:.6}\t{dove:.6}");
    }
}
