//! Polygon shapefile helpers: reading footprint layers with their attribute
//! tables, and writing index layers with all-character attribute fields.
use std::collections::BTreeMap;
use std::path::Path;

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{PolygonRing, Writer};

use crate::io::geodata::{field_value_to_string, GeodataError};

/// One polygon feature with its attribute table rendered as text.
#[derive(Debug, Clone)]
pub struct Footprint {
    pub geometry: MultiPolygon<f64>,
    pub attrs: BTreeMap<String, String>,
}

impl Footprint {
    pub fn attr(&self, name: &str) -> &str {
        self.attrs.get(name).map(String::as_str).unwrap_or("")
    }
}

fn to_geo(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    let mut outers: Vec<Polygon<f64>> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();
    for ring in polygon.rings() {
        let coords: Vec<Coord<f64>> = ring
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        match ring {
            PolygonRing::Outer(_) => outers.push(Polygon::new(LineString::from(coords), vec![])),
            PolygonRing::Inner(_) => holes.push(LineString::from(coords)),
        }
    }
    // Shapefiles with holes are not produced by this chain; attach any inner
    // rings to the first outer ring.
    if let (Some(first), false) = (outers.first_mut(), holes.is_empty()) {
        let exterior = first.exterior().clone();
        *first = Polygon::new(exterior, holes);
    }
    MultiPolygon(outers)
}

/// Read a polygon layer as footprints with text attributes.
pub fn read_polygon_layer(path: &Path) -> Result<Vec<Footprint>, GeodataError> {
    let shapes = shapefile::read_as::<_, shapefile::Polygon, Record>(path)?;
    let mut footprints = Vec::with_capacity(shapes.len());
    for (polygon, record) in shapes {
        let attrs = record
            .into_iter()
            .map(|(name, value)| (name, field_value_to_string(&value)))
            .collect();
        footprints.push(Footprint {
            geometry: to_geo(&polygon),
            attrs,
        });
    }
    Ok(footprints)
}

/// Read a polygon layer as a single dissolved multipolygon, ignoring the
/// attribute table. Used for AOI boundary files.
pub fn read_aoi_polygons(path: &Path) -> Result<MultiPolygon<f64>, GeodataError> {
    let footprints = read_polygon_layer(path)?;
    let polygons = footprints
        .into_iter()
        .flat_map(|f| f.geometry.0)
        .collect::<Vec<_>>();
    Ok(MultiPolygon(polygons))
}

fn to_shapefile(geometry: &MultiPolygon<f64>) -> shapefile::Polygon {
    let mut rings = Vec::new();
    for polygon in &geometry.0 {
        let outer: Vec<shapefile::Point> = polygon
            .exterior()
            .coords()
            .map(|c| shapefile::Point::new(c.x, c.y))
            .collect();
        rings.push(PolygonRing::Outer(outer));
        for interior in polygon.interiors() {
            let inner: Vec<shapefile::Point> = interior
                .coords()
                .map(|c| shapefile::Point::new(c.x, c.y))
                .collect();
            rings.push(PolygonRing::Inner(inner));
        }
    }
    shapefile::Polygon::with_rings(rings)
}

/// Write polygon features with character attributes. `rows` pairs each
/// geometry with its values, parallel to `field_names`.
pub fn write_polygon_records(
    path: &Path,
    field_names: &[&str],
    rows: &[(MultiPolygon<f64>, Vec<String>)],
) -> Result<(), GeodataError> {
    // DBF field names are limited to 10 characters.
    let names: Vec<String> = field_names
        .iter()
        .map(|n| n.chars().take(10).collect())
        .collect();

    let mut builder = TableWriterBuilder::new();
    for (idx, name) in names.iter().enumerate() {
        let width = rows
            .iter()
            .map(|(_, values)| values[idx].len())
            .max()
            .unwrap_or(1)
            .clamp(1, 254) as u8;
        let field_name = FieldName::try_from(name.as_str())
            .map_err(|e| GeodataError::MissingColumn(format!("{name}: {e:?}")))?;
        builder = builder.add_character_field(field_name, width);
    }

    let mut writer = Writer::from_path(path, builder)?;
    for (geometry, values) in rows {
        let shape = to_shapefile(geometry);
        let mut record = Record::default();
        for (name, value) in names.iter().zip(values) {
            record.insert(name.clone(), FieldValue::Character(Some(value.clone())));
        }
        writer.write_shape_and_record(&shape, &record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
        .into()
    }

    #[test]
    fn polygon_layer_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footprints.shp");
        let rows = vec![
            (square(12.0, 42.0, 1.0), vec!["A1".to_string(), "117".to_string()]),
            (square(14.0, 40.0, 2.0), vec!["A2".to_string(), "044".to_string()]),
        ];
        write_polygon_records(&path, &["Name", "Track"], &rows).unwrap();

        let back = read_polygon_layer(&path).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].attr("Name"), "A1");
        assert_eq!(back[1].attr("Track"), "044");
        assert_eq!(back[0].geometry.0.len(), 1);
    }

    #[test]
    fn long_field_names_are_truncated_for_dbf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.shp");
        let rows = vec![(square(0.0, 0.0, 1.0), vec!["v".to_string()])];
        write_polygon_records(&path, &["a_very_long_field_name"], &rows).unwrap();
        let back = read_polygon_layer(&path).unwrap();
        assert_eq!(back[0].attr("a_very_lon"), "v");
    }

    #[test]
    fn aoi_reader_collects_all_polygons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.shp");
        let rows = vec![
            (square(0.0, 0.0, 1.0), vec!["a".to_string()]),
            (square(5.0, 5.0, 1.0), vec!["b".to_string()]),
        ];
        write_polygon_records(&path, &["id"], &rows).unwrap();
        let aoi = read_aoi_polygons(&path).unwrap();
        assert_eq!(aoi.0.len(), 2);
    }
}
