//! Product merging: concatenate the per-burst or per-tile deliverables of an
//! index into one product per partition, with its XML sidecar, packaged as a
//! delivery archive.
pub mod bursts;
pub mod sidecar;
pub mod tiles;

pub use bursts::merge_bursts;
pub use tiles::merge_tiles;

use std::path::{Path, PathBuf};

use crate::catalog::aoi::{get_aoi_info, AoiInfo};
use crate::error::{Error, Result};
use crate::io::geodata::PointTable;
use crate::types::OutputFormat;

/// AOI resolved from the index file stem, e.g. `AOIs_bursts/sicilia.shp`.
pub(crate) fn aoi_from_index(index_file: &Path) -> Result<AoiInfo> {
    let stem = index_file
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingInput(index_file.to_path_buf()))?;
    get_aoi_info(stem)
}

/// Per-AOI output directory, created on demand.
pub(crate) fn aoi_out_dir(out_dir: &Path, aoi: &AoiInfo) -> Result<PathBuf> {
    let dir = out_dir.join(aoi.tag);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write the merged table as `<stem>.<ext>` in the requested format.
/// CSV keeps the attribute columns only; shapefiles are written in WGS84.
pub(crate) fn write_product(
    table: &PointTable,
    out_dir: &Path,
    stem: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    let out_file = out_dir.join(format!("{stem}.{}", format.extension()));
    match format {
        OutputFormat::Csv => table.write_csv(&out_file)?,
        OutputFormat::Shp => table.write_shapefile(&out_file)?,
    }
    Ok(out_file)
}
