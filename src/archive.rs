/// Renames the solver's fixed-name outputs into the archive layout
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SweepError;
use crate::profile_scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn letter(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// One archived output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub electrode: u32,
    pub layer: i32,
    pub axis: Axis,
    pub path: PathBuf,
}

impl ArchiveEntry {
    /// `<base>_E<electrode>_L<layer>_<axis>.dat`, the name the field
    /// interpolation tool looks for.
    pub fn file_name(base_name: &str, electrode: u32, layer: i32, axis: Axis) -> String {
        format!("{}_E{}_L{}_{}.dat", base_name, electrode, layer, axis)
    }
}

pub struct OutputArchiver {
    output_dir: PathBuf,
    base_name: String,
    outputs: Vec<(String, Axis)>,
}

impl OutputArchiver {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        base_name: impl Into<String>,
        outputs: impl IntoIterator<Item = (String, Axis)>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
            outputs: outputs.into_iter().collect(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Move the fixed-name outputs of the run that just finished to their
    /// archive names. The fixed names no longer exist afterwards.
    pub fn archive_run(&self, electrode: u32, layer: i32) -> Result<Vec<ArchiveEntry>, SweepError> {
        profile_scope!("archive_run");
        let mut entries = Vec::with_capacity(self.outputs.len());
        for (fixed_name, axis) in &self.outputs {
            let from = self.output_dir.join(fixed_name);
            let to = self.output_dir.join(ArchiveEntry::file_name(
                &self.base_name,
                electrode,
                layer,
                *axis,
            ));

            match fs::rename(&from, &to) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(SweepError::MissingOutput {
                        path: from,
                        electrode,
                        layer,
                    });
                }
                Err(e) => return Err(e.into()),
            }

            println!("\t\tRenamed {} to {}", fixed_name, to.display());
            entries.push(ArchiveEntry {
                electrode,
                layer,
                axis: *axis,
                path: to,
            });
        }
        Ok(entries)
    }

    /// Delete the auxiliary file the solver leaves once per sweep. Returns
    /// whether it was there.
    pub fn remove_auxiliary(&self, name: &str) -> Result<bool, SweepError> {
        let path = self.output_dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("auxiliary output {} not found", path.display());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
