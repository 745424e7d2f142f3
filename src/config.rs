// Centralized constants for the solver contract and archive layout

// ====================
// Solver config keys
// ====================
pub const KEY_OUTPUT_PATH: &str = "OUTPUT_PATH";
pub const KEY_PA_PATH: &str = "PA_PATH";
pub const KEY_PA_FILE_NAME: &str = "PA_FILE_NAME";
pub const KEY_EXTRACTION_COORDINATE: &str = "EXTRACTION_COORDINATE";

/// Keys every solver config must carry before a sweep can start.
pub const REQUIRED_KEYS: [&str; 4] = [
    KEY_OUTPUT_PATH,
    KEY_PA_PATH,
    KEY_PA_FILE_NAME,
    KEY_EXTRACTION_COORDINATE,
];

// ====================
// Solver invocation
// ====================
pub const DEFAULT_SOLVER_PATH: &str = "./LEXSIMECK.OUT";
pub const DEFAULT_QUIET_FLAG: &str = "-q";

// Fixed names the solver writes into the output directory on every run
pub const DEFAULT_OUTPUT_X: &str = "mat_ga_x.dat";
pub const DEFAULT_OUTPUT_Y: &str = "mat_ga_y.dat";
pub const DEFAULT_OUTPUT_Z: &str = "mat_ga_z.dat";
/// Combined field file the solver leaves behind once per sweep; never archived.
pub const DEFAULT_AUXILIARY_OUTPUT: &str = "mat_ga_e.dat";

// ====================
// Array files
// ====================
/// Extension stem shared by every array file: `<base>.pa<N>`.
pub const PA_EXTENSION_PREFIX: &str = "pa";
/// Suffix of the background member, `<base>.pa0`.
pub const PA_BACKGROUND_SUFFIX: &str = "0";
/// Suffix of the combined member, `<base>.pa#`.
pub const PA_COMBINED_SUFFIX: &str = "#";
/// Bytes of the array header holding the grid description.
pub const PA_HEADER_LEN: usize = 32;

// ====================
// Layers and manifest
// ====================
/// Layers 0 and 1 sit on the grid boundary and carry no usable slice.
pub const DEFAULT_FIRST_LAYER: i32 = 2;
pub const DEFAULT_MANIFEST_NAME: &str = "flyE.conf";
/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "pa_sweep.toml";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
