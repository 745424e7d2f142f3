use super::runner::dir_string;
use super::*;
use crate::config_file::SolverConfig;
use crate::error::SweepError;
use crate::header::header_bytes;
use crate::manifest::Manifest;
use crate::settings::SweepSettings;
use crate::solver::Solver;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = "; LEXSIMECK extraction settings\n\
PA_PATH= ./ \n\
PA_FILE_NAME= old.pa1\n\
OUTPUT_PATH= ./ \n\
EXTRACTION_COORDINATE= 0\n\
SURFACE_ENHANCEMENT= 1\n";

/// Stands in for the solver: reads the config it is handed and writes the
/// fixed-name outputs where OUTPUT_PATH points.
#[derive(Default)]
struct FakeSolver {
    invocations: Vec<(String, String)>,
    fail_on: Option<(String, String)>,
}

impl Solver for FakeSolver {
    fn run(&mut self, config_path: &Path) -> Result<(), SweepError> {
        let config = SolverConfig::load(config_path)?;
        let pa_file = config.get("PA_FILE_NAME").unwrap().to_string();
        let layer = config.get("EXTRACTION_COORDINATE").unwrap().to_string();
        let output_dir = PathBuf::from(config.get("OUTPUT_PATH").unwrap());
        self.invocations.push((pa_file.clone(), layer.clone()));

        if self.fail_on == Some((pa_file.clone(), layer.clone())) {
            return Ok(());
        }
        for name in ["mat_ga_x.dat", "mat_ga_y.dat", "mat_ga_z.dat", "mat_ga_e.dat"] {
            fs::write(output_dir.join(name), format!("{pa_file} {layer}"))?;
        }
        Ok(())
    }
}

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new(nx: i32, config: &str) -> Self {
        let temp = TempDir::new().expect("tempdir should be created");
        let pa_dir = temp.path().join("pa");
        fs::create_dir(&pa_dir).unwrap();
        for name in ["dev.pa0", "dev.pa#", "dev.pa1", "dev.pa2"] {
            fs::write(pa_dir.join(name), header_bytes(nx, 10, 10)).unwrap();
        }
        fs::write(temp.path().join("sweep.cfg"), config).unwrap();
        Self { temp }
    }

    fn runner(&self, solver: FakeSolver) -> SweepRunner<FakeSolver> {
        SweepRunner::new(
            SweepSettings::default(),
            self.temp.path().join("pa"),
            self.temp.path().join("sweep.cfg"),
            self.temp.path().join("run").join("dat"),
            solver,
        )
    }

    fn dat_dir(&self) -> PathBuf {
        self.temp.path().join("run").join("dat")
    }

    fn dat_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dat_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[test]
fn full_sweep_archives_every_electrode_and_layer() {
    let fixture = Fixture::new(5, CONFIG);
    let mut runner = fixture.runner(FakeSolver::default());

    let summary = runner.run().unwrap();
    assert_eq!(runner.state(), SweepState::Done);
    assert_eq!(summary.base_name, "dev");
    assert_eq!(summary.electrodes, 2);
    assert_eq!(summary.runs, 6);
    assert_eq!(summary.archived_files, 18);

    let expected_runs: Vec<(String, String)> = ["dev.pa1", "dev.pa2"]
        .iter()
        .flat_map(|pa| (2..=4).map(move |l| (pa.to_string(), l.to_string())))
        .collect();
    assert_eq!(runner.solver().invocations, expected_runs);

    let mut expected_files = Vec::new();
    for e in 1..=2 {
        for l in 2..=4 {
            for axis in ["X", "Y", "Z"] {
                expected_files.push(format!("dev_E{e}_L{l}_{axis}.dat"));
            }
        }
    }
    expected_files.sort();
    assert_eq!(fixture.dat_files(), expected_files);

    // Each archive holds the output of its own run, not a stale leftover
    let content = fs::read_to_string(fixture.dat_dir().join("dev_E2_L3_Y.dat")).unwrap();
    assert_eq!(content, "dev.pa2 3");

    let manifest = Manifest::load(fixture.temp.path().join("run").join("flyE.conf")).unwrap();
    assert_eq!(manifest.n_electrodes, 2);
    assert_eq!((manifest.nx, manifest.ny, manifest.nz), (5, 10, 10));
    assert_eq!(manifest.pa_name, "dev");
    let dat_dir = fs::canonicalize(fixture.dat_dir()).unwrap();
    assert_eq!(PathBuf::from(&manifest.dat_directory), dat_dir);
    assert!(manifest.dat_directory.ends_with(std::path::MAIN_SEPARATOR));
}

#[test]
fn config_keeps_paths_and_last_run_values() {
    let fixture = Fixture::new(5, CONFIG);
    fixture.runner(FakeSolver::default()).run().unwrap();

    let config = SolverConfig::load(fixture.temp.path().join("sweep.cfg")).unwrap();
    let dat_dir = fs::canonicalize(fixture.dat_dir()).unwrap();
    let pa_dir = fs::canonicalize(fixture.temp.path().join("pa")).unwrap();
    assert_eq!(PathBuf::from(config.get("OUTPUT_PATH").unwrap()), dat_dir);
    assert_eq!(PathBuf::from(config.get("PA_PATH").unwrap()), pa_dir);
    assert_eq!(config.get("PA_FILE_NAME"), Some("dev.pa2"));
    assert_eq!(config.get("EXTRACTION_COORDINATE"), Some("4"));

    let text = config.render();
    assert!(text.starts_with("; LEXSIMECK extraction settings\n"));
    assert!(text.ends_with("SURFACE_ENHANCEMENT= 1\n"));
}

#[test]
fn missing_output_stops_the_sweep() {
    let fixture = Fixture::new(5, CONFIG);
    let solver = FakeSolver {
        fail_on: Some(("dev.pa1".to_string(), "3".to_string())),
        ..FakeSolver::default()
    };
    let mut runner = fixture.runner(solver);

    match runner.run() {
        Err(SweepError::MissingOutput {
            electrode, layer, ..
        }) => assert_eq!((electrode, layer), (1, 3)),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(
        runner.state(),
        SweepState::Archiving {
            electrode: 1,
            layer: 3
        }
    );
    assert_eq!(runner.solver().invocations.len(), 2);

    let files = fixture.dat_files();
    assert!(files.iter().all(|f| !f.starts_with("dev_E2")));
    assert!(files.iter().all(|f| !f.contains("_L4_")));
    assert!(!fixture.temp.path().join("run").join("flyE.conf").exists());
}

#[test]
fn config_without_required_key_fails_before_any_run() {
    let config = CONFIG.replace("EXTRACTION_COORDINATE= 0\n", "");
    let fixture = Fixture::new(5, &config);
    let mut runner = fixture.runner(FakeSolver::default());

    match runner.run() {
        Err(SweepError::ConfigKeyNotFound { key }) => assert_eq!(key, "EXTRACTION_COORDINATE"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(runner.state(), SweepState::Idle);
    assert!(runner.solver().invocations.is_empty());
    assert_eq!(
        fs::read_to_string(fixture.temp.path().join("sweep.cfg")).unwrap(),
        config
    );
}

#[test]
fn grid_without_valid_layers_still_writes_manifest() {
    let fixture = Fixture::new(2, CONFIG);
    let mut runner = fixture.runner(FakeSolver::default());

    let summary = runner.run().unwrap();
    assert_eq!(summary.runs, 0);
    assert!(runner.solver().invocations.is_empty());
    assert!(fixture.dat_files().is_empty());

    let manifest = Manifest::load(&summary.manifest_path).unwrap();
    assert_eq!(manifest.n_electrodes, 2);
    assert_eq!(manifest.nx, 2);
}

#[test]
fn incomplete_array_set_is_rejected() {
    let fixture = Fixture::new(5, CONFIG);
    fs::remove_file(fixture.temp.path().join("pa").join("dev.pa#")).unwrap();
    let mut runner = fixture.runner(FakeSolver::default());

    assert!(matches!(
        runner.run(),
        Err(SweepError::MissingReservedFile { .. })
    ));
    assert!(runner.solver().invocations.is_empty());
}

#[test]
fn output_dir_with_whitespace_fails_before_config_is_written() {
    let fixture = Fixture::new(5, CONFIG);
    let mut runner = SweepRunner::new(
        SweepSettings::default(),
        fixture.temp.path().join("pa"),
        fixture.temp.path().join("sweep.cfg"),
        fixture.temp.path().join("run data").join("dat"),
        FakeSolver::default(),
    );

    match runner.run() {
        Err(SweepError::ConfigValue { key, .. }) => assert_eq!(key, "OUTPUT_PATH"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(runner.solver().invocations.is_empty());
    assert_eq!(
        fs::read_to_string(fixture.temp.path().join("sweep.cfg")).unwrap(),
        CONFIG
    );
}

#[test]
fn dir_string_appends_one_separator() {
    let sep = std::path::MAIN_SEPARATOR;
    let dir = PathBuf::from(format!("{sep}data{sep}dat"));
    assert_eq!(dir_string(&dir).unwrap(), format!("{sep}data{sep}dat{sep}"));
    let with_sep = PathBuf::from(format!("{sep}data{sep}dat{sep}"));
    assert_eq!(dir_string(&with_sep).unwrap(), format!("{sep}data{sep}dat{sep}"));
}

#[cfg(unix)]
#[test]
fn non_utf8_directory_is_rejected() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = Path::new("/data").join(OsStr::from_bytes(b"dat\xff"));
    assert!(matches!(dir_string(&dir), Err(SweepError::NonUtf8Path(p)) if p == dir));
}
