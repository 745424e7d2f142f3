use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::{Duration, Instant};

use crate::archive::OutputArchiver;
use crate::config_file::SolverConfig;
use crate::electrodes::ArrayFileSet;
use crate::error::SweepError;
use crate::header::{read_header, GridGeometry};
use crate::manifest::Manifest;
use crate::settings::SweepSettings;
use crate::solver::Solver;

/// Where the sweep currently is. Left at the failing state if a run aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    Initialized,
    PerElectrode { electrode: u32 },
    PerLayer { electrode: u32, layer: i32 },
    Invoking { electrode: u32, layer: i32 },
    Archiving { electrode: u32, layer: i32 },
    Finalizing,
    Done,
}

#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub base_name: String,
    pub geometry: GridGeometry,
    pub electrodes: usize,
    pub runs: usize,
    pub archived_files: usize,
    pub manifest_path: PathBuf,
    pub elapsed: Duration,
}

pub struct SweepRunner<S: Solver> {
    settings: SweepSettings,
    array_dir: PathBuf,
    config_path: PathBuf,
    output_dir: PathBuf,
    solver: S,
    state: SweepState,
}

/// Absolute directory path with a trailing separator; the solver and the
/// manifest reader both append file names to it directly.
pub(crate) fn dir_string(path: &Path) -> Result<String, SweepError> {
    let mut s = path
        .to_str()
        .ok_or_else(|| SweepError::NonUtf8Path(path.to_path_buf()))?
        .to_string();
    if !s.ends_with(MAIN_SEPARATOR) {
        s.push(MAIN_SEPARATOR);
    }
    Ok(s)
}

impl<S: Solver> SweepRunner<S> {
    pub fn new(
        settings: SweepSettings,
        array_dir: impl Into<PathBuf>,
        config_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        solver: S,
    ) -> Self {
        Self {
            settings,
            array_dir: array_dir.into(),
            config_path: config_path.into(),
            output_dir: output_dir.into(),
            solver,
            state: SweepState::Idle,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Run every electrode over every valid layer, then write the manifest.
    /// The first error aborts the sweep.
    pub fn run(&mut self) -> Result<SweepSummary, SweepError> {
        let start_time = Instant::now();
        self.state = SweepState::Idle;

        fs::create_dir_all(&self.output_dir)?;
        let output_dir = fs::canonicalize(&self.output_dir)?;
        let array_dir = fs::canonicalize(&self.array_dir)?;
        let config_path = fs::canonicalize(&self.config_path)?;

        let set = ArrayFileSet::resolve(&array_dir)?;
        let geometry = read_header(set.geometry_source())?;
        let first_layer = self.settings.first_layer;
        let layer_count = geometry.layer_count(first_layer);

        println!("✓ Array set '{}' with {} electrodes", set.base_name, set.len());
        println!(
            "✓ Grid {} x {} x {}; {} layers per electrode",
            geometry.nx, geometry.ny, geometry.nz, layer_count
        );
        tracing::info!(
            "sweep of {} runs into {}",
            geometry.run_count(set.len(), first_layer),
            output_dir.display()
        );

        let mut config = SolverConfig::load(&config_path)?;
        if let Some(key) = config.missing_keys().first() {
            return Err(SweepError::ConfigKeyNotFound {
                key: key.to_string(),
            });
        }
        let dat_directory = dir_string(&output_dir)?;
        config.set_paths(&dat_directory, &dir_string(&array_dir)?)?;
        config.save(&config_path)?;
        self.state = SweepState::Initialized;

        let archiver = OutputArchiver::new(
            &output_dir,
            set.base_name.clone(),
            self.settings.outputs.by_axis(),
        );
        let mut runs = 0;
        let mut archived_files = 0;

        for (i, electrode) in set.electrodes.iter().enumerate() {
            self.state = SweepState::PerElectrode {
                electrode: electrode.id,
            };
            config.set_electrode_file(&electrode.file_name)?;
            println!("Working on electrode {}:", electrode.id);

            for layer in geometry.layers(first_layer) {
                self.state = SweepState::PerLayer {
                    electrode: electrode.id,
                    layer,
                };
                config.set_layer(layer)?;
                config.save(&config_path)?;

                self.state = SweepState::Invoking {
                    electrode: electrode.id,
                    layer,
                };
                self.solver.run(&config_path)?;

                self.state = SweepState::Archiving {
                    electrode: electrode.id,
                    layer,
                };
                archived_files += archiver.archive_run(electrode.id, layer)?.len();
                runs += 1;

                println!(
                    "Electrode {}/{}; Layer {}/{} - done",
                    i + 1,
                    set.len(),
                    layer - first_layer + 1,
                    layer_count
                );
            }
        }

        self.state = SweepState::Finalizing;
        archiver.remove_auxiliary(&self.settings.auxiliary_output)?;

        let manifest = Manifest {
            n_electrodes: set.len(),
            nx: geometry.nx,
            ny: geometry.ny,
            nz: geometry.nz,
            dat_directory,
            pa_name: set.base_name.clone(),
        };
        let manifest_path = manifest.write(&output_dir, &self.settings.manifest_name)?;
        println!("✓ Manifest written to {}", manifest_path.display());

        self.state = SweepState::Done;
        let elapsed = start_time.elapsed();
        tracing::info!("sweep finished: {} runs in {:.2}s", runs, elapsed.as_secs_f32());

        Ok(SweepSummary {
            base_name: set.base_name,
            geometry,
            electrodes: set.electrodes.len(),
            runs,
            archived_files,
            manifest_path,
            elapsed,
        })
    }
}
