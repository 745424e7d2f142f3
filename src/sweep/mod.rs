/// Sweep orchestration: one solver run per (electrode, layer) pair
///
/// This module provides functionality to:
/// - Point the solver config at the array and output directories
/// - Step the config through every electrode and extraction layer
/// - Archive each run's fixed-name outputs under collision-free names
/// - Write the dataset manifest once the sweep completes

pub mod runner;

pub use runner::{SweepRunner, SweepState, SweepSummary};

#[cfg(test)]
mod tests;
