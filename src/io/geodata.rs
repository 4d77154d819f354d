//! Tabular point geodata: the crate's stand-in for a geodataframe.
//!
//! Burst and tile deliverables are point time-series tables shipped as CSV
//! (inside a zip archive) or as point shapefiles. A [`PointTable`] keeps every
//! attribute as text, exactly as read, plus one point geometry per row in the
//! table CRS. That is all the merge pipelines need: concatenation, coordinate
//! deduplication, polygon clipping, and CSV / shapefile serialization.
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use geo::Contains;
use geo_types::{Coord, MultiPolygon, Point};
use regex::Regex;
use thiserror::Error;
use zip::ZipArchive;

use crate::crs::{self, Crs};

#[derive(Debug, Error)]
pub enum GeodataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),
    #[error("Archive {0:?} is not a valid zip file")]
    BadArchive(PathBuf),
    #[error("No CSV member found in archive {0:?}")]
    NoCsvMember(PathBuf),
    #[error("File extension of {0:?} not recognised")]
    UnsupportedExtension(PathBuf),
    #[error("Missing coordinate columns in {0:?} (need easting/northing or latitude/longitude)")]
    MissingCoordinates(PathBuf),
    #[error("Column `{0}` not found")]
    MissingColumn(String),
    #[error("Invalid coordinate value `{value}` in column `{column}`")]
    BadCoordinate { column: String, value: String },
    #[error("Cannot concatenate zero tables")]
    EmptyConcat,
}

/// One table row: a point in the table CRS plus the attribute values,
/// parallel to [`PointTable::columns`].
#[derive(Debug, Clone)]
pub struct PointRow {
    pub point: Coord<f64>,
    pub values: Vec<String>,
}

/// A point-geometry attribute table.
#[derive(Debug, Clone)]
pub struct PointTable {
    pub crs: Crs,
    pub columns: Vec<String>,
    pub rows: Vec<PointRow>,
}

/// Normalize the column names used by upstream providers to the standard
/// ones expected downstream.
fn normalize_column(name: &str) -> String {
    match name {
        "LAT" => "latitude".to_string(),
        "LON" => "longitude".to_string(),
        "CODE" => "pid".to_string(),
        other => other.to_string(),
    }
}

impl PointTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, GeodataError> {
        self.column_index(name)
            .ok_or_else(|| GeodataError::MissingColumn(name.to_string()))
    }

    /// Number of distinct values in a column, if present.
    pub fn unique_count(&self, column: &str) -> Option<usize> {
        let idx = self.column_index(column)?;
        let mut seen = HashSet::new();
        for row in &self.rows {
            seen.insert(row.values[idx].as_str());
        }
        Some(seen.len())
    }

    /// Concatenate tables that do not necessarily share the same columns.
    /// The result carries the union of all columns in first-seen order;
    /// missing cells are empty. The CRS of the first table wins.
    pub fn concat(tables: Vec<PointTable>) -> Result<PointTable, GeodataError> {
        let crs = tables.first().ok_or(GeodataError::EmptyConcat)?.crs;
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for col in &table.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|c| columns.iter().position(|o| o == c).unwrap_or(usize::MAX))
                .collect();
            for row in table.rows {
                let point = crs::transform(row.point, table.crs, crs);
                let mut values = vec![String::new(); columns.len()];
                for (src, value) in row.values.into_iter().enumerate() {
                    let dst = mapping[src];
                    if dst != usize::MAX {
                        values[dst] = value;
                    }
                }
                rows.push(PointRow { point, values });
            }
        }
        Ok(PointTable { crs, columns, rows })
    }

    /// Drop duplicate rows sharing the same value pair in the two named
    /// columns, keeping the first occurrence.
    pub fn dedup_by(&mut self, col_a: &str, col_b: &str) -> Result<(), GeodataError> {
        let a = self.require_column(col_a)?;
        let b = self.require_column(col_b)?;
        let mut seen = HashSet::new();
        self.rows
            .retain(|row| seen.insert((row.values[a].clone(), row.values[b].clone())));
        Ok(())
    }

    /// Keep only the rows whose point falls inside the clip polygons.
    /// The polygons are reprojected to the table CRS before testing.
    pub fn clip(&mut self, polygons: &MultiPolygon<f64>, polygons_crs: Crs) {
        let clip = crs::transform_multi_polygon(polygons, polygons_crs, self.crs);
        self.rows
            .retain(|row| clip.contains(&Point::new(row.point.x, row.point.y)));
    }

    /// Apply the delivery naming convention to date columns: any column whose
    /// name is a bare digit string (or already `D`-prefixed digits) becomes
    /// `D<digits>`.
    pub fn normalize_date_columns(&mut self) {
        let Ok(pattern) = Regex::new(r"^D?(\d+)$") else {
            return;
        };
        for col in &mut self.columns {
            if let Some(caps) = pattern.captures(col) {
                *col = format!("D{}", &caps[1]);
            }
        }
    }

    /// Reproject the table to WGS84.
    pub fn to_wgs84(&self) -> PointTable {
        let rows = self
            .rows
            .iter()
            .map(|row| PointRow {
                point: crs::transform(row.point, self.crs, Crs::Epsg4326),
                values: row.values.clone(),
            })
            .collect();
        PointTable {
            crs: Crs::Epsg4326,
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Total bounds as `(min_x, min_y, max_x, max_y)` in the table CRS.
    pub fn total_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.rows.first()?;
        let mut bounds = (first.point.x, first.point.y, first.point.x, first.point.y);
        for row in &self.rows {
            bounds.0 = bounds.0.min(row.point.x);
            bounds.1 = bounds.1.min(row.point.y);
            bounds.2 = bounds.2.max(row.point.x);
            bounds.3 = bounds.3.max(row.point.y);
        }
        Some(bounds)
    }

    /// Closed envelope ring of the table extent, counter-clockwise from the
    /// lower-left corner.
    pub fn envelope_ring(&self) -> Option<Vec<(f64, f64)>> {
        let (min_x, min_y, max_x, max_y) = self.total_bounds()?;
        Some(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ])
    }

    /// Write the attribute table as a geometry-less CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<(), GeodataError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(&row.values)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table as an ESRI point shapefile in EPSG:4326, all
    /// attributes as character fields.
    pub fn write_shapefile(&self, path: &Path) -> Result<(), GeodataError> {
        let table = self.to_wgs84();

        // DBF field names are limited to 10 characters.
        let field_names: Vec<String> = table
            .columns
            .iter()
            .map(|c| c.chars().take(10).collect())
            .collect();

        let mut builder = shapefile::dbase::TableWriterBuilder::new();
        for (idx, name) in field_names.iter().enumerate() {
            let width = table
                .rows
                .iter()
                .map(|r| r.values[idx].len())
                .max()
                .unwrap_or(1)
                .clamp(1, 254) as u8;
            let field_name = shapefile::dbase::FieldName::try_from(name.as_str())
                .map_err(|e| GeodataError::MissingColumn(format!("{name}: {e:?}")))?;
            builder = builder.add_character_field(field_name, width);
        }

        let mut writer = shapefile::Writer::from_path(path, builder)?;
        for row in &table.rows {
            let shape = shapefile::Point::new(row.point.x, row.point.y);
            let mut record = shapefile::dbase::Record::default();
            for (name, value) in field_names.iter().zip(&row.values) {
                record.insert(
                    name.clone(),
                    shapefile::dbase::FieldValue::Character(Some(value.clone())),
                );
            }
            writer.write_shape_and_record(&shape, &record)?;
        }
        Ok(())
    }
}

fn parse_coord(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<f64, GeodataError> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim()
        .parse()
        .map_err(|_| GeodataError::BadCoordinate {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn read_csv_from_reader<R: Read>(reader: R, origin: &Path) -> Result<PointTable, GeodataError> {
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);
    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_column)
        .collect();

    let find = |name: &str| columns.iter().position(|c| c == name);
    // Tile and burst tables are gridded on the European LAEA grid; fall back
    // to the geographic columns when the grid coordinates are absent.
    let (x_idx, y_idx, crs) = match (find("easting"), find("northing")) {
        (Some(x), Some(y)) => (x, y, Crs::Epsg3035),
        _ => match (find("longitude"), find("latitude")) {
            (Some(x), Some(y)) => (x, y, Crs::Epsg4326),
            _ => return Err(GeodataError::MissingCoordinates(origin.to_path_buf())),
        },
    };

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let x = parse_coord(&record, x_idx, &columns[x_idx])?;
        let y = parse_coord(&record, y_idx, &columns[y_idx])?;
        rows.push(PointRow {
            point: Coord { x, y },
            values: record.iter().map(str::to_string).collect(),
        });
    }
    Ok(PointTable { crs, columns, rows })
}

fn read_csv_table(path: &Path) -> Result<PointTable, GeodataError> {
    read_csv_from_reader(File::open(path)?, path)
}

fn read_zip_table(path: &Path) -> Result<PointTable, GeodataError> {
    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|_| GeodataError::BadArchive(path.to_path_buf()))?;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|_| GeodataError::BadArchive(path.to_path_buf()))?;
        if entry.name().ends_with(".csv") {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            return read_csv_from_reader(Cursor::new(bytes), path);
        }
    }
    Err(GeodataError::NoCsvMember(path.to_path_buf()))
}

/// Attribute field names of a shapefile layer, in DBF header order.
/// `dbase::Record` is a hash map; the header is the only ordered source.
pub fn dbf_field_names(path: &Path) -> Result<Vec<String>, GeodataError> {
    let reader = shapefile::dbase::Reader::from_path(path.with_extension("dbf"))
        .map_err(shapefile::Error::from)?;
    Ok(reader
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        // The deletion marker is not an attribute field.
        .filter(|name| name != "DeletionFlag")
        .collect())
}

fn read_shp_table(path: &Path) -> Result<PointTable, GeodataError> {
    let field_names = dbf_field_names(path)?;
    let columns: Vec<String> = field_names.iter().map(|n| normalize_column(n)).collect();

    let shapes = shapefile::read_as::<_, shapefile::Point, shapefile::dbase::Record>(path)?;
    let mut rows = Vec::new();
    for (point, record) in &shapes {
        let values = field_names
            .iter()
            .map(|name| {
                record
                    .get(name)
                    .map(field_value_to_string)
                    .unwrap_or_default()
            })
            .collect();
        rows.push(PointRow {
            point: Coord { x: point.x, y: point.y },
            values,
        });
    }

    // Point shapefiles in the delivery chain are in EPSG:4326.
    Ok(PointTable {
        crs: Crs::Epsg4326,
        columns,
        rows,
    })
}

/// Render a DBF attribute value as text.
pub fn field_value_to_string(value: &shapefile::dbase::FieldValue) -> String {
    use shapefile::dbase::FieldValue;
    match value {
        FieldValue::Character(Some(s)) => s.clone(),
        FieldValue::Character(None) => String::new(),
        FieldValue::Numeric(Some(n)) => {
            if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        FieldValue::Numeric(None) => String::new(),
        FieldValue::Float(Some(f)) => f.to_string(),
        FieldValue::Float(None) => String::new(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Double(d) => d.to_string(),
        FieldValue::Logical(Some(b)) => b.to_string(),
        FieldValue::Logical(None) => String::new(),
        FieldValue::Date(Some(d)) => format!("{d:?}"),
        FieldValue::Date(None) => String::new(),
        other => format!("{other:?}"),
    }
}

/// Read a deliverable as a point table, dispatching on the file extension:
/// `.csv`, `.shp`, or `.zip` (first CSV member).
pub fn read_point_table(path: &Path) -> Result<PointTable, GeodataError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv_table(path),
        Some("zip") => read_zip_table(path),
        Some("shp") => read_shp_table(path),
        _ => Err(GeodataError::UnsupportedExtension(path.to_path_buf())),
    }
}
