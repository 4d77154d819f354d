//! Tile index generation.
//!
//! Joins the gridded-product tile footprint layer against an AOI boundary,
//! resolves each tile archive on disk by its grid identifier, and writes the
//! index under `AOIs_tiles/` with one record set per ortho component.
use std::path::{Path, PathBuf};

use geo::Intersects;
use geo_types::MultiPolygon;
use regex::Regex;
use tracing::{debug, info};

use crate::crs::{self, Crs};
use crate::error::{Error, Result};
use crate::io::geodata::dbf_field_names;
use crate::io::shp::{read_aoi_polygons, read_polygon_layer, write_polygon_records, Footprint};
use crate::io::xml::read_archive_metadata;
use crate::types::Ortho;

/// Grid identifier of a tile footprint: the first exterior ring vertex in
/// EPSG:3035, truncated to the 100 km grid.
pub fn tile_id(geometry: &MultiPolygon<f64>) -> Option<String> {
    let first = geometry.0.first()?.exterior().coords().next()?;
    let xc = (first.x / 1e5).floor() as i64;
    let yc = (first.y / 1e5).ceil() as i64;
    Some(format!("E{xc}N{yc}"))
}

/// Dates of a tile archive: from the embedded XML when present, otherwise
/// from fields 2 and 3 of the `_`-split file name.
fn tile_dates(path: &Path, archive_name: &str) -> Result<(String, String)> {
    let meta = read_archive_metadata(path)?;
    match (meta.get("start_date"), meta.get("end_date")) {
        (Some(start), Some(end)) => Ok((start.clone(), end.clone())),
        _ => {
            let fields: Vec<&str> = archive_name.split('_').collect();
            let start = fields.get(2).copied().unwrap_or("None");
            let end = fields.get(3).copied().unwrap_or("None");
            Ok((start.to_string(), end.to_string()))
        }
    }
}

/// Build the tile index for one AOI. Returns the path of the written
/// shapefile.
pub fn index_tiles(tile_file: &Path, aoi_file: &Path, tile_dir: &Path) -> Result<PathBuf> {
    if !aoi_file.is_file() {
        return Err(Error::MissingInput(aoi_file.to_path_buf()));
    }
    let aoi = read_aoi_polygons(aoi_file)?;

    info!("looking for tiles covering the selected area of interest");
    let footprints = read_polygon_layer(tile_file)?;
    let joined: Vec<Footprint> = footprints
        .into_iter()
        .filter(|f| f.geometry.intersects(&aoi))
        .map(|f| Footprint {
            geometry: crs::transform_multi_polygon(&f.geometry, Crs::Epsg4326, Crs::Epsg3035),
            attrs: f.attrs,
        })
        .collect();
    if joined.is_empty() {
        return Err(Error::EmptyJoin { what: "tiles" });
    }

    let listing = super::zip_listing(tile_dir)?;

    // Carried-over footprint attributes, in source field order, minus the
    // join artifact.
    let carried: Vec<String> = dbf_field_names(tile_file)?
        .into_iter()
        .filter(|k| k != "overlap")
        .collect();
    let mut fields: Vec<&str> = carried.iter().map(String::as_str).collect();
    fields.extend(["Path", "Ortho", "start_date", "end_date"]);

    let mut rows: Vec<(MultiPolygon<f64>, Vec<String>)> = Vec::new();
    for ortho in Ortho::ALL {
        for footprint in &joined {
            let id = tile_id(&footprint.geometry)
                .ok_or(Error::MissingField("tile geometry"))?;
            debug!(tile = %id, ortho = ortho.tag(), "looking for tile");
            let pattern = Regex::new(&format!("{id}{}", ortho.tag()))?;
            let found = listing
                .iter()
                .find(|name| pattern.is_match(name));

            let (path, start, end) = match found {
                Some(name) => {
                    let path = tile_dir.join(name);
                    let (start, end) = tile_dates(&path, name)?;
                    (path.to_string_lossy().into_owned(), start, end)
                }
                None => ("None".to_string(), "None".to_string(), "None".to_string()),
            };

            let mut values: Vec<String> = carried
                .iter()
                .map(|k| footprint.attr(k).to_string())
                .collect();
            values.extend([path, ortho.tag().to_string(), start, end]);
            rows.push((footprint.geometry.clone(), values));
        }
    }

    let out_shp = super::index_output_path(tile_dir, "AOIs_tiles", aoi_file)?;
    write_polygon_records(&out_shp, &fields, &rows)?;
    info!(path = %out_shp.display(), "tile index saved");
    Ok(out_shp)
}
