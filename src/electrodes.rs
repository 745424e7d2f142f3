/// Electrode discovery from a directory of array files
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{PA_BACKGROUND_SUFFIX, PA_COMBINED_SUFFIX, PA_EXTENSION_PREFIX};
use crate::error::SweepError;

/// One electrode's array file, `<base>.pa<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Electrode {
    pub id: u32,
    pub file_name: String,
}

/// The array files of one device model, minus the background and combined members.
#[derive(Debug, Clone)]
pub struct ArrayFileSet {
    pub dir: PathBuf,
    pub base_name: String,
    /// Sorted by `id`
    pub electrodes: Vec<Electrode>,
}

/// Split `<stem>.pa<suffix>` into `(stem, suffix)`. The suffix is either
/// all digits or the combined marker.
fn split_array_name(file_name: &str) -> Option<(&str, &str)> {
    let marker = format!(".{}", PA_EXTENSION_PREFIX);
    let (stem, suffix) = file_name.rsplit_once(marker.as_str())?;
    let is_digits = !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit());
    if stem.is_empty() || !(is_digits || suffix == PA_COMBINED_SUFFIX) {
        return None;
    }
    Some((stem, suffix))
}

impl ArrayFileSet {
    pub fn resolve<P: AsRef<Path>>(dir: P) -> Result<Self, SweepError> {
        let dir = dir.as_ref();
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Self::from_names(dir, &names)
    }

    /// Build the set from a directory listing.
    pub fn from_names(dir: &Path, names: &[String]) -> Result<Self, SweepError> {
        let base_name = names
            .iter()
            .find_map(|name| split_array_name(name).map(|(stem, _)| stem.to_string()))
            .ok_or_else(|| SweepError::NoElectrodes(dir.to_path_buf()))?;

        let mut has_background = false;
        let mut has_combined = false;
        let mut electrodes = Vec::new();

        for name in names {
            let Some((stem, suffix)) = split_array_name(name) else {
                tracing::debug!("ignoring non-array file {}", name);
                continue;
            };
            if stem != base_name {
                tracing::debug!("ignoring {} (base name is {})", name, base_name);
                continue;
            }
            if suffix == PA_BACKGROUND_SUFFIX {
                has_background = true;
            } else if suffix == PA_COMBINED_SUFFIX {
                has_combined = true;
            } else {
                let id = suffix
                    .parse::<u32>()
                    .map_err(|e| SweepError::format(dir.join(name), e.to_string()))?;
                electrodes.push(Electrode {
                    id,
                    file_name: name.clone(),
                });
            }
        }

        for (present, suffix) in [
            (has_background, PA_BACKGROUND_SUFFIX),
            (has_combined, PA_COMBINED_SUFFIX),
        ] {
            if !present {
                return Err(SweepError::MissingReservedFile {
                    dir: dir.to_path_buf(),
                    name: format!("{}.{}{}", base_name, PA_EXTENSION_PREFIX, suffix),
                });
            }
        }

        if electrodes.is_empty() {
            return Err(SweepError::NoElectrodes(dir.to_path_buf()));
        }
        electrodes.sort_by_key(|e| e.id);

        Ok(Self {
            dir: dir.to_path_buf(),
            base_name,
            electrodes,
        })
    }

    pub fn len(&self) -> usize {
        self.electrodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electrodes.is_empty()
    }

    /// Array file whose header describes the common grid.
    pub fn geometry_source(&self) -> PathBuf {
        self.dir.join(&self.electrodes[0].file_name)
    }
}
