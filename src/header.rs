/// Array file header decoding
use bincode::Options;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::config::PA_HEADER_LEN;
use crate::error::SweepError;

/// On-disk layout of the first 32 bytes of every array file.
#[derive(Debug, Deserialize)]
struct RawHeader {
    mode: i32,
    symmetry: i32,
    max_voltage: f64,
    nx: i32,
    ny: i32,
    nz: i32,
    mirror: i32,
}

/// Grid facts shared by every array file of one device model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub mode: i32,
    pub symmetry: i32,
    pub max_voltage: f64,
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    pub mirror: i32,
}

impl GridGeometry {
    /// Decode a header from raw bytes. Extra bytes past the header are ignored.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self, SweepError> {
        if bytes.len() < PA_HEADER_LEN {
            return Err(SweepError::format(
                path,
                format!("header is {} bytes, expected {}", bytes.len(), PA_HEADER_LEN),
            ));
        }

        let raw: RawHeader = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_little_endian()
            .allow_trailing_bytes()
            .deserialize(&bytes[..PA_HEADER_LEN])
            .map_err(|e| SweepError::format(path, e.to_string()))?;

        if raw.nx <= 0 || raw.ny <= 0 || raw.nz <= 0 {
            return Err(SweepError::format(
                path,
                format!(
                    "non-positive grid extents ({}, {}, {})",
                    raw.nx, raw.ny, raw.nz
                ),
            ));
        }

        Ok(Self {
            mode: raw.mode,
            symmetry: raw.symmetry,
            max_voltage: raw.max_voltage,
            nx: raw.nx,
            ny: raw.ny,
            nz: raw.nz,
            mirror: raw.mirror,
        })
    }

    /// Extraction layers along x, starting at `first_layer` and stopping short of `nx`.
    pub fn layers(&self, first_layer: i32) -> RangeInclusive<i32> {
        first_layer..=(self.nx - 1)
    }

    /// Number of layers in `layers(first_layer)`; zero when the grid is too thin.
    pub fn layer_count(&self, first_layer: i32) -> usize {
        (self.nx - first_layer).max(0) as usize
    }

    /// Total solver invocations for a sweep over `n_electrodes`.
    pub fn run_count(&self, n_electrodes: usize, first_layer: i32) -> usize {
        n_electrodes * self.layer_count(first_layer)
    }
}

/// Read the grid geometry from the header of one array file.
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<GridGeometry, SweepError> {
    let path = path.as_ref();
    let mut bytes = Vec::with_capacity(PA_HEADER_LEN);
    File::open(path)?
        .take(PA_HEADER_LEN as u64)
        .read_to_end(&mut bytes)?;
    let geometry = GridGeometry::from_bytes(path, &bytes)?;
    tracing::debug!(
        "header {}: nx={} ny={} nz={} mode={} mirror={}",
        path.display(),
        geometry.nx,
        geometry.ny,
        geometry.nz,
        geometry.mode,
        geometry.mirror
    );
    Ok(geometry)
}

#[cfg(test)]
pub(crate) fn header_bytes(nx: i32, ny: i32, nz: i32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(PA_HEADER_LEN);
    bytes.extend_from_slice(&(-1i32).to_le_bytes());
    bytes.extend_from_slice(&1i32.to_le_bytes());
    bytes.extend_from_slice(&100_000.0f64.to_le_bytes());
    bytes.extend_from_slice(&nx.to_le_bytes());
    bytes.extend_from_slice(&ny.to_le_bytes());
    bytes.extend_from_slice(&nz.to_le_bytes());
    bytes.extend_from_slice(&4i32.to_le_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn decodes_packed_little_endian_header() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("dev.pa1");
        let mut bytes = header_bytes(5, 10, 12);
        // Grid data following the header must not affect decoding
        bytes.extend_from_slice(&[0xAB; 64]);
        std::fs::write(&path, bytes).unwrap();

        let geometry = read_header(&path).unwrap();
        assert_eq!(geometry.mode, -1);
        assert_eq!(geometry.symmetry, 1);
        assert_eq!(geometry.max_voltage, 100_000.0);
        assert_eq!((geometry.nx, geometry.ny, geometry.nz), (5, 10, 12));
        assert_eq!(geometry.mirror, 4);
    }

    #[test]
    fn short_file_is_a_format_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("dev.pa1");
        std::fs::write(&path, &header_bytes(5, 10, 10)[..20]).unwrap();

        let err = read_header(&path).unwrap_err();
        assert!(matches!(err, SweepError::Format { .. }));
    }

    #[test]
    fn non_positive_extent_is_a_format_error() {
        let err = GridGeometry::from_bytes(Path::new("dev.pa1"), &header_bytes(5, 0, 10))
            .unwrap_err();
        assert!(matches!(err, SweepError::Format { .. }));
    }

    #[test]
    fn layers_skip_boundary_slices() {
        let geometry = GridGeometry::from_bytes(Path::new("dev.pa1"), &header_bytes(5, 10, 10))
            .unwrap();
        assert_eq!(geometry.layers(2).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(geometry.layer_count(2), 3);
        assert_eq!(geometry.run_count(2, 2), 6);
    }

    #[test]
    fn thin_grid_has_no_layers() {
        let geometry = GridGeometry::from_bytes(Path::new("dev.pa1"), &header_bytes(2, 10, 10))
            .unwrap();
        assert_eq!(geometry.layers(2).count(), 0);
        assert_eq!(geometry.layer_count(2), 0);
    }
}
