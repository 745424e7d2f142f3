/// Dataset descriptor read by the field interpolation tool
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SweepError;

const N_ELECTRODES: &str = "N_ELECTRODES";
const X_DIMENSION: &str = "X_DIMENSION";
const Y_DIMENSION: &str = "Y_DIMENSION";
const Z_DIMENSION: &str = "Z_DIMENSION";
const DAT_DIRECTORY: &str = "DAT_DIRECTORY";
const PA_NAME: &str = "PA_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub n_electrodes: usize,
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    /// Kept with its trailing separator; readers append the base name directly.
    pub dat_directory: String,
    pub pa_name: String,
}

impl Manifest {
    /// Where the manifest for `output_dir` lives: one level above it.
    pub fn path_for(output_dir: &Path, manifest_name: &str) -> PathBuf {
        output_dir.join("..").join(manifest_name)
    }

    /// Write (or overwrite) the manifest next to `output_dir`.
    pub fn write(&self, output_dir: &Path, manifest_name: &str) -> Result<PathBuf, SweepError> {
        let path = Self::path_for(output_dir, manifest_name);
        fs::write(&path, self.to_string())?;
        Ok(path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SweepError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|reason| SweepError::format(path, reason))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let mut n_electrodes = None;
        let mut nx = None;
        let mut ny = None;
        let mut nz = None;
        let mut dat_directory = None;
        let mut pa_name = None;

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            let int = |v: &str| {
                v.parse::<i32>()
                    .map_err(|e| format!("{} has invalid value '{}': {}", key.trim(), v, e))
            };
            match key.trim() {
                N_ELECTRODES => {
                    n_electrodes = Some(value.parse::<usize>().map_err(|e| {
                        format!("{} has invalid value '{}': {}", N_ELECTRODES, value, e)
                    })?)
                }
                X_DIMENSION => nx = Some(int(value)?),
                Y_DIMENSION => ny = Some(int(value)?),
                Z_DIMENSION => nz = Some(int(value)?),
                DAT_DIRECTORY => dat_directory = Some(value.to_string()),
                PA_NAME => pa_name = Some(value.to_string()),
                _ => {}
            }
        }

        let missing = |key: &str| format!("manifest has no {} entry", key);
        Ok(Self {
            n_electrodes: n_electrodes.ok_or_else(|| missing(N_ELECTRODES))?,
            nx: nx.ok_or_else(|| missing(X_DIMENSION))?,
            ny: ny.ok_or_else(|| missing(Y_DIMENSION))?,
            nz: nz.ok_or_else(|| missing(Z_DIMENSION))?,
            dat_directory: dat_directory.ok_or_else(|| missing(DAT_DIRECTORY))?,
            pa_name: pa_name.ok_or_else(|| missing(PA_NAME))?,
        })
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}=\t{}", N_ELECTRODES, self.n_electrodes)?;
        writeln!(f, "{}=\t{}", X_DIMENSION, self.nx)?;
        writeln!(f, "{}=\t{}", Y_DIMENSION, self.ny)?;
        writeln!(f, "{}=\t{}", Z_DIMENSION, self.nz)?;
        writeln!(f, "{}=\t{}", DAT_DIRECTORY, self.dat_directory)?;
        writeln!(f, "{}=\t{}", PA_NAME, self.pa_name)
    }
}
