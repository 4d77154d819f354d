//! Merge the gridded-product tiles of an AOI index into one product per
//! deformation direction.
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::io::archive::write_product_archive;
use crate::io::geodata::{read_point_table, PointTable};
use crate::io::shp::{read_aoi_polygons, read_polygon_layer, Footprint};
use crate::io::xml::{self, read_archive_metadata};
use crate::merge::sidecar::{build_sidecar, Constituent, ProductMeta};
use crate::types::{Ortho, OutputFormat, SENSOR};

/// Constituent entry for a tile archive. Multi-geometry tiles all descend
/// from the 2D deformation SVC01 product.
fn tile_constituent(path: &Path) -> Result<Constituent> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingInput(path.to_path_buf()))?;
    let product_code = stem
        .split('_')
        .nth(1)
        .ok_or(Error::MissingField("product code"))?;

    let gsp_id_in = format!("S301{SENSOR}03");
    let product_id = stem.replace(product_code, &gsp_id_in);

    let meta = read_archive_metadata(path)?;
    Ok(Constituent {
        gsp_id: gsp_id_in,
        product_id,
        member_tag: "tile_id",
        member_id: xml::require(&meta, "tile_id")?.to_string(),
    })
}

/// Merge the tiles listed in `index_file` into one product per deformation
/// direction under `out_dir/<AOI_TAG>/`. Returns the delivery archives
/// written.
pub fn merge_tiles(
    index_file: &Path,
    out_dir: &Path,
    clip_aoi: Option<&Path>,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    if !index_file.is_file() {
        return Err(Error::MissingInput(index_file.to_path_buf()));
    }
    info!(index = %index_file.display(), "loading index file");
    let index: Vec<Footprint> = read_polygon_layer(index_file)?
        .into_iter()
        .filter(|r| r.attr("Path") != "None")
        .collect();
    if index.is_empty() {
        return Err(Error::EmptyIndex(index_file.to_path_buf()));
    }

    let aoi = super::aoi_from_index(index_file)?;
    let out_dir = super::aoi_out_dir(out_dir, &aoi)?;
    let clip = clip_aoi.map(read_aoi_polygons).transpose()?;

    info!("merging tiles based on deformation direction [V, E]");
    let mut archives = Vec::new();
    for ortho in Ortho::ALL {
        let rows: Vec<&Footprint> = index
            .iter()
            .filter(|r| r.attr("Ortho") == ortho.tag())
            .collect();
        if rows.is_empty() {
            warn!(ortho = ortho.tag(), "no tiles found for direction");
            continue;
        }

        // Product metadata from the first tile: identifiers from its XML,
        // reference period from its file name.
        let first_path = Path::new(rows[0].attr("Path")).to_path_buf();
        let first_stem = first_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::MissingInput(first_path.clone()))?;
        let stem_fields: Vec<&str> = first_stem.split('_').collect();
        let start_date = stem_fields
            .get(2)
            .copied()
            .ok_or(Error::MissingField("start date"))?
            .to_string();
        let end_date = stem_fields
            .get(3)
            .copied()
            .ok_or(Error::MissingField("end date"))?
            .to_string();

        let meta = read_archive_metadata(&first_path)?;
        let prod_id = xml::require(&meta, "product_id")?.to_string();
        let prod_id_ns = prod_id.replace('-', "");
        let production_date = xml::require(&meta, "production_date")?.replace('-', "");
        let provider = xml::require(&meta, "provider")?.to_string();
        let crs = xml::require(&meta, "crs")?.to_string();

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            tables.push(read_point_table(Path::new(row.attr("Path")))?);
        }
        let mut table = PointTable::concat(tables)?;
        table.dedup_by("easting", "northing")?;
        if let Some(clip) = &clip {
            info!("clipping the output to the AOI");
            table.clip(clip, Crs::Epsg4326);
        }
        table.normalize_date_columns();
        info!(points = table.len(), "tiles merged");

        let stem = format!(
            "ISS_{prod_id_ns}_{start_date}_{end_date}_{}O{}_01",
            aoi.tag,
            ortho.tag()
        );
        let data_file = super::write_product(&table, &out_dir, &stem, format)?;
        info!(file = %data_file.display(), "saved merged file");

        let wgs84 = table.to_wgs84();
        let bounds = wgs84
            .total_bounds()
            .ok_or(Error::EmptyJoin { what: "merged tiles" })?;
        let envelope = wgs84
            .envelope_ring()
            .ok_or(Error::EmptyJoin { what: "merged tiles" })?;

        let mut constituents = Vec::with_capacity(rows.len());
        for row in &rows {
            constituents.push(tile_constituent(Path::new(row.attr("Path")))?);
        }

        let product_meta = ProductMeta {
            gsp_id: prod_id,
            product_id: stem.clone(),
            track_id: None,
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
    Ok(archives)
}
