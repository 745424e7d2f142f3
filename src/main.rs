/// Runs the field solver for every electrode and extraction layer of a PA set
use clap::Parser;
use pa_sweep::settings::SweepSettings;
use pa_sweep::solver::ExternalSolver;
use pa_sweep::sweep::SweepRunner;
use pa_sweep::SweepError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding the <base>.pa0, <base>.pa# and <base>.paN array files
    #[arg(value_name = "PA_DIR")]
    pa_dir: PathBuf,

    /// Solver config file, rewritten in place before every run
    #[arg(value_name = "CONFIG_FILE")]
    config_file: PathBuf,

    /// Directory receiving the archived field files
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,
}

fn run(args: Args, settings: SweepSettings) -> Result<(), SweepError> {
    let solver = ExternalSolver::new(&settings.solver_path, settings.quiet_flag.clone());
    let mut runner = SweepRunner::new(
        settings,
        args.pa_dir,
        args.config_file,
        args.output_dir,
        solver,
    );

    let summary = runner.run()?;
    println!(
        "\n✅ Sweep of '{}' completed: {} electrodes, {} runs, {} files in {:.2}s",
        summary.base_name,
        summary.electrodes,
        summary.runs,
        summary.archived_files,
        summary.elapsed.as_secs_f32()
    );

    #[cfg(feature = "profiling")]
    pa_sweep::PROFILER.lock().print_and_clear();

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let settings = match SweepSettings::load_default() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Sweep aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
