pub mod chart;
pub mod cli;
pub mod config;
pub mod equilibrium;
pub mod error;
pub mod simulation;
pub mod stats;
pub mod sweep;
