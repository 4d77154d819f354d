//! Delivery index generation: which product archives cover an area of
//! interest, and where they live on disk.
pub mod bursts;
pub mod tiles;

pub use bursts::index_bursts;
pub use tiles::index_tiles;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Sorted `.zip` file names of a product directory.
pub(crate) fn zip_listing(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::MissingInput(dir.to_path_buf()));
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".zip") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Index output path: a sibling of the product directory named `label`,
/// holding one shapefile per AOI.
pub(crate) fn index_output_path(product_dir: &Path, label: &str, aoi_file: &Path) -> Result<PathBuf> {
    let parent = product_dir.parent().unwrap_or_else(|| Path::new("."));
    let out_dir = parent.join(label);
    std::fs::create_dir_all(&out_dir)?;
    let name = aoi_file
        .file_name()
        .ok_or_else(|| Error::MissingInput(aoi_file.to_path_buf()))?;
    Ok(out_dir.join(name))
}
