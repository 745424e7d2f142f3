pub mod archive;
pub mod config;
pub mod config_file;
pub mod electrodes;
pub mod error;
pub mod header;
pub mod manifest;
pub mod profiler;
pub mod settings;
pub mod solver;
pub mod sweep;

pub use error::SweepError;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
