//! Burst index generation.
//!
//! Joins a Sentinel-1 burst footprint layer against an AOI boundary, scans a
//! directory of burst deliverables for the matching archives, and writes the
//! resulting index shapefile under `AOIs_bursts/` next to the burst directory.
use std::path::{Path, PathBuf};

use geo::Intersects;
use geo_types::MultiPolygon;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::io::shp::{read_aoi_polygons, read_polygon_layer, write_polygon_records, Footprint};
use crate::io::xml::read_archive_metadata;
use crate::types::{CalibrationType, OrbitDirection};

/// Fields of the burst index layer.
const INDEX_FIELDS: &[&str] = &[
    "Name",
    "Track",
    "Burst",
    "Subswath",
    "Orbit_Dir",
    "c_type",
    "Path",
    "start_date",
    "end_date",
];

/// Decode the orbit direction from a burst archive name. The track number is
/// followed by `A` or `D` right before the burst and sub-swath identifiers.
pub fn orbit_direction(f_name: &str, track: &str, burst: &str, subswath: &str) -> OrbitDirection {
    for (tag, dir) in [
        ("A", OrbitDirection::Ascending),
        ("D", OrbitDirection::Descending),
    ] {
        if let Ok(pattern) = Regex::new(&format!(
            "{}{}{}{}",
            regex::escape(track),
            tag,
            regex::escape(burst),
            regex::escape(subswath)
        )) {
            if pattern.is_match(f_name) {
                return dir;
            }
        }
    }
    OrbitDirection::Unknown
}

fn join_footprints(layer: &Path, aoi: &MultiPolygon<f64>) -> Result<Vec<Footprint>> {
    let footprints = read_polygon_layer(layer)?;
    Ok(footprints
        .into_iter()
        .filter(|f| f.geometry.intersects(aoi))
        .collect())
}

struct IndexRecord {
    geometry: MultiPolygon<f64>,
    values: Vec<String>,
}

fn placeholder_record(footprint: &Footprint) -> IndexRecord {
    IndexRecord {
        geometry: footprint.geometry.clone(),
        values: vec![
            footprint.attr("Name").to_string(),
            footprint.attr("Track").to_string(),
            footprint.attr("Burst").to_string(),
            footprint.attr("Subswath").to_string(),
            "None".to_string(),
            "None".to_string(),
            "None".to_string(),
            "None".to_string(),
            "None".to_string(),
        ],
    }
}

fn archive_record(
    footprint: &Footprint,
    burst_dir: &Path,
    archive_name: &str,
) -> Result<IndexRecord> {
    let track = footprint.attr("Track");
    let burst = footprint.attr("Burst");
    let subswath = footprint.attr("Subswath");
    let path = burst_dir.join(archive_name);

    let meta = read_archive_metadata(&path)?;
    let start_date = meta.get("start_date").cloned().unwrap_or_default();
    let end_date = meta.get("end_date").cloned().unwrap_or_default();

    // The calibration level is encoded as the suffix of the 5th `_` field of
    // the archive name for this provider.
    let c_type = archive_name
        .split('_')
        .nth(4)
        .map(CalibrationType::from_processing_field)
        .unwrap_or(CalibrationType::Unspecified);

    Ok(IndexRecord {
        geometry: footprint.geometry.clone(),
        values: vec![
            footprint.attr("Name").to_string(),
            track.to_string(),
            burst.to_string(),
            subswath.to_string(),
            orbit_direction(archive_name, track, burst, subswath)
                .tag()
                .to_string(),
            c_type.code().to_string(),
            path.to_string_lossy().into_owned(),
            start_date,
            end_date,
        ],
    })
}

/// Build the burst index for one AOI. Returns the path of the written
/// shapefile.
pub fn index_bursts(burst_file: &Path, aoi_file: &Path, burst_dir: &Path) -> Result<PathBuf> {
    if !aoi_file.is_file() {
        return Err(Error::MissingInput(aoi_file.to_path_buf()));
    }
    let aoi = read_aoi_polygons(aoi_file)?;

    info!("looking for bursts covering the selected area of interest");
    let joined = join_footprints(burst_file, &aoi)?;
    if joined.is_empty() {
        return Err(Error::EmptyJoin { what: "bursts" });
    }

    let listing = super::zip_listing(burst_dir)?;
    let mut records: Vec<IndexRecord> = Vec::new();
    for footprint in &joined {
        let pattern = Regex::new(&format!(
            "{}.*{}{}",
            regex::escape(footprint.attr("Track")),
            regex::escape(footprint.attr("Burst")),
            regex::escape(footprint.attr("Subswath"))
        ))?;
        let found: Vec<&String> = listing.iter().filter(|n| pattern.is_match(n)).collect();
        if found.is_empty() {
            warn!(
                track = footprint.attr("Track"),
                burst = footprint.attr("Burst"),
                "no archive found for burst"
            );
            records.push(placeholder_record(footprint));
            continue;
        }
        for name in found {
            records.push(archive_record(footprint, burst_dir, name)?);
        }
    }

    let out_shp = super::index_output_path(burst_dir, "AOIs_bursts", aoi_file)?;
    let rows: Vec<(MultiPolygon<f64>, Vec<String>)> = records
        .into_iter()
        .map(|r| (r.geometry, r.values))
        .collect();
    write_polygon_records(&out_shp, INDEX_FIELDS, &rows)?;
    info!(path = %out_shp.display(), "burst index saved");
    Ok(out_shp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_direction_decoding() {
        let name = "ISS_S301SNT02_20220101_20221231_117A0266IW1C_01.zip";
        assert_eq!(
            orbit_direction(name, "117", "0266", "IW1"),
            OrbitDirection::Ascending
        );
        let name = "ISS_S301SNT02_20220101_20221231_044D0110IW2B_01.zip";
        assert_eq!(
            orbit_direction(name, "044", "0110", "IW2"),
            OrbitDirection::Descending
        );
        assert_eq!(
            orbit_direction("unrelated.zip", "117", "0266", "IW1"),
            OrbitDirection::Unknown
        );
    }
}
