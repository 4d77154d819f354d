//! Merge the bursts of an AOI index into one product per track and
//! calibration level.
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::io::archive::write_product_archive;
use crate::io::geodata::{read_point_table, PointTable};
use crate::io::shp::{read_aoi_polygons, read_polygon_layer, Footprint};
use crate::io::xml::{self, read_archive_metadata};
use crate::merge::sidecar::{build_sidecar, Constituent, ProductMeta};
use crate::types::{CalibrationType, OutputFormat, SENSOR};

/// Calibration levels processed per track, in delivery order.
const CALIBRATION_LEVELS: &[CalibrationType] = &[
    CalibrationType::Calibrated,
    CalibrationType::Basic,
    CalibrationType::Unspecified,
];

/// Reconstruct the SVC01 identifiers of a constituent burst from its
/// delivery path: the source gsp_id by calibration suffix, and the original
/// product_id with the calibration marker stripped.
fn burst_constituent(path: &Path) -> Result<Constituent> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingInput(path.to_path_buf()))?;
    let fields: Vec<&str> = stem.split('_').collect();
    let processing = *fields.get(4).ok_or(Error::MissingField("processing"))?;
    let product_code = *fields.get(1).ok_or(Error::MissingField("product code"))?;

    let gsp_id_in = if processing.ends_with('B') {
        format!("S301{SENSOR}01")
    } else {
        format!("S301{SENSOR}02")
    };
    let mut trimmed = processing.to_string();
    trimmed.pop();
    let product_id = stem
        .replace(product_code, &gsp_id_in)
        .replace(processing, &trimmed);

    let meta = read_archive_metadata(path)?;
    Ok(Constituent {
        gsp_id: gsp_id_in,
        product_id,
        member_tag: "burst_id",
        member_id: xml::require(&meta, "burst_id")?.to_string(),
    })
}

fn load_partition(rows: &[&Footprint]) -> Result<PointTable> {
    let mut tables = Vec::with_capacity(rows.len());
    for row in rows {
        tables.push(read_point_table(Path::new(row.attr("Path")))?);
    }
    Ok(PointTable::concat(tables)?)
}

/// Merge the bursts listed in `index_file` into per-track products under
/// `out_dir/<AOI_TAG>/`. Returns the delivery archives written.
pub fn merge_bursts(
    index_file: &Path,
    out_dir: &Path,
    clip_aoi: Option<&Path>,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    if !index_file.is_file() {
        return Err(Error::MissingInput(index_file.to_path_buf()));
    }
    info!(index = %index_file.display(), "loading index file");
    let index = read_polygon_layer(index_file)?;
    let aoi = super::aoi_from_index(index_file)?;
    let out_dir = super::aoi_out_dir(out_dir, &aoi)?;

    let clip = clip_aoi.map(read_aoi_polygons).transpose()?;

    let mut tracks: Vec<String> = Vec::new();
    for row in &index {
        let track = row.attr("Track").to_string();
        if !tracks.contains(&track) {
            tracks.push(track);
        }
    }

    let mut archives = Vec::new();
    for track in &tracks {
        let track_rows: Vec<&Footprint> =
            index.iter().filter(|r| r.attr("Track") == track).collect();
        info!(%track, bursts = track_rows.len(), "processing track");

        for &c_type in CALIBRATION_LEVELS {
            let rows: Vec<&Footprint> = track_rows
                .iter()
                .copied()
                .filter(|r| {
                    r.attr("Path") != "None"
                        && CalibrationType::from_code(r.attr("c_type")) == Some(c_type)
                })
                .collect();
            if rows.is_empty() {
                warn!(%track, c_type = %c_type, "no bursts found for track");
                continue;
            }

            // Product-level metadata comes from the first burst archive.
            let first_path = Path::new(rows[0].attr("Path")).to_path_buf();
            let meta = read_archive_metadata(&first_path)?;
            let prod_id = xml::require(&meta, "product_id")?.to_string();
            let prod_id_ns = prod_id.replace('-', "");
            let start_date = xml::require(&meta, "start_date")?.replace('-', "");
            let end_date = xml::require(&meta, "end_date")?.replace('-', "");
            let production_date = xml::require(&meta, "production_date")?.replace('-', "");
            let provider = xml::require(&meta, "provider")?.to_string();
            let crs = xml::require(&meta, "crs")?.to_string();
            let orbit_dir = rows[0].attr("Orbit_Dir").to_string();

            let mut table = load_partition(&rows)?;
            table.dedup_by("latitude", "longitude")?;
            if let Some(clip) = &clip {
                info!("clipping the output to the AOI");
                table.clip(clip, Crs::Epsg4326);
            }
            table.normalize_date_columns();
            info!(
                points = table.len(),
                unique_pid = table.unique_count("pid").unwrap_or(0),
                "bursts merged"
            );

            let stem = format!(
                "ISS_{prod_id_ns}_{start_date}_{end_date}_{track}{}{orbit_dir}{}_01",
                aoi.tag,
                c_type.suffix()
            );
            let data_file = super::write_product(&table, &out_dir, &stem, format)?;
            info!(file = %data_file.display(), "saved merged file");

            let wgs84 = table.to_wgs84();
            let bounds = wgs84
                .total_bounds()
                .ok_or(Error::EmptyJoin { what: "merged bursts" })?;
            let envelope = wgs84
                .envelope_ring()
                .ok_or(Error::EmptyJoin { what: "merged bursts" })?;

            let mut constituents = Vec::with_capacity(rows.len());
            for row in &rows {
                constituents.push(burst_constituent(Path::new(row.attr("Path")))?);
            }

            let product_meta = ProductMeta {
                gsp_id: prod_id,
                product_id: stem.clone(),
                track_id: Some(track.clone()),
                provider,
                production_date,
                start_date,
                end_date,
                aoi_tag: aoi.tag.to_string(),
                crs,
            };
            let sidecar = build_sidecar(&product_meta, bounds, &envelope, &constituents)?;
            let metadata_file = out_dir.join(format!("{stem}.xml"));
            info!(file = %metadata_file.display(), "generating metadata file");
            xml::write_pretty(&sidecar, &metadata_file)?;

            let zip_file = out_dir.join(format!("{stem}.zip"));
            info!(file = %zip_file.display(), "creating delivery archive");
            write_product_archive(&zip_file, &[data_file, metadata_file])?;
            archives.push(zip_file);
        }
    }
    Ok(archives)
}
