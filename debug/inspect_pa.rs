use pa_sweep::config_file::SolverConfig;
use pa_sweep::electrodes::ArrayFileSet;
use pa_sweep::header::read_header;
use pa_sweep::settings::SweepSettings;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: cargo run --features debug_bins --bin inspect_pa <pa_dir> [config_file]");
        return;
    }

    println!("=== Array Set Inspection ===");

    let set = match ArrayFileSet::resolve(&args[1]) {
        Ok(set) => set,
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    };
    println!("Base name: {}", set.base_name);
    println!("Electrodes ({}):", set.len());
    for electrode in &set.electrodes {
        println!("  E{:<4} {}", electrode.id, electrode.file_name);
    }

    let source = set.geometry_source();
    match read_header(&source) {
        Ok(geometry) => {
            let first_layer = SweepSettings::default().first_layer;
            println!("Header of {}:", source.display());
            println!("  mode: {}", geometry.mode);
            println!("  symmetry: {}", geometry.symmetry);
            println!("  max_voltage: {}", geometry.max_voltage);
            println!("  extents: {} x {} x {}", geometry.nx, geometry.ny, geometry.nz);
            println!("  mirror: {}", geometry.mirror);
            println!(
                "  layers per electrode: {} (planned runs: {})",
                geometry.layer_count(first_layer),
                geometry.run_count(set.len(), first_layer)
            );
        }
        Err(e) => println!("❌ {}", e),
    }

    if let Some(config_path) = args.get(2) {
        match SolverConfig::load(config_path) {
            Ok(config) => {
                let missing = config.missing_keys();
                if missing.is_empty() {
                    println!("✅ Config {} has every required key", config_path);
                } else {
                    println!("❌ Config {} is missing: {}", config_path, missing.join(", "));
                }
            }
            Err(e) => println!("❌ {}", e),
        }
    }

    println!("\n=== Inspection completed ===");
}
