//! Sidecar metadata documents for merged products.
//!
//! Every merged deliverable ships with a `<GSP>` XML document describing the
//! product, its spatial extent, and the constituent products it was built
//! from, ancillary input datasets included.
use serde_json::json;

use crate::catalog::gsp;
use crate::error::Result;
use crate::io::xml::XmlElement;
use crate::types::SENSOR;

/// Product-level sidecar fields.
#[derive(Debug, Clone)]
pub struct ProductMeta {
    /// GSP identifier of the source product family, e.g. `S3-01-SNT-02`.
    pub gsp_id: String,
    /// Output product identifier (the delivery file stem).
    pub product_id: String,
    /// Satellite track, absent for multi-geometry products.
    pub track_id: Option<String>,
    pub provider: String,
    /// Dates in compact `yyyymmdd` form.
    pub production_date: String,
    pub start_date: String,
    pub end_date: String,
    pub aoi_tag: String,
    pub crs: String,
}

/// One constituent product entry of the `<dataset>` section.
#[derive(Debug, Clone)]
pub struct Constituent {
    pub gsp_id: String,
    pub product_id: String,
    /// `burst_id` or `tile_id`.
    pub member_tag: &'static str,
    pub member_id: String,
}

/// GeoJSON rendering of a closed envelope ring.
pub fn envelope_geojson(ring: &[(f64, f64)]) -> String {
    json!({
        "type": "Polygon",
        "coordinates": [ring],
    })
    .to_string()
}

/// Assemble the sidecar document for a merged product.
pub fn build_sidecar(
    meta: &ProductMeta,
    bounds: (f64, f64, f64, f64),
    envelope: &[(f64, f64)],
    constituents: &[Constituent],
) -> Result<XmlElement> {
    let mut root = XmlElement::new("GSP");
    root.leaf("gsp_id", meta.gsp_id.as_str());
    root.leaf("product_id", meta.product_id.as_str());
    root.leaf("description", gsp::description(&meta.gsp_id));
    root.leaf("sensor_id", SENSOR);
    if let Some(track) = &meta.track_id {
        root.leaf("track_id", track.as_str());
    }
    root.leaf("provider", meta.provider.as_str());
    root.leaf("production_date", meta.production_date.as_str());
    root.leaf("start_date", meta.start_date.as_str());
    root.leaf("end_date", meta.end_date.as_str());
    root.leaf("aoi", meta.aoi_tag.as_str());

    let (x_min, y_min, x_max, y_max) = bounds;
    root.leaf("bbox", format!("{x_min} {y_min} {x_max} {y_max}"));
    root.leaf("geometry", envelope_geojson(envelope));
    root.leaf("crs", meta.crs.as_str());

    let mut dataset = XmlElement::new("dataset");
    for input in gsp::input_datasets(&meta.gsp_id) {
        dataset.push(input.to_xml());
    }
    for constituent in constituents {
        let mut gsp = XmlElement::new("gsp");
        gsp.leaf("gsp_id", constituent.gsp_id.as_str());
        gsp.leaf("product_id", constituent.product_id.as_str());
        gsp.leaf(constituent.member_tag, constituent.member_id.as_str());
        gsp.leaf("description", gsp::description(&constituent.gsp_id));
        dataset.push(gsp);
    }
    root.push(dataset);
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::xml::flatten_xml;
    use crate::io::xml::to_pretty_string;

    fn sample_meta() -> ProductMeta {
        ProductMeta {
            gsp_id: "S3-01-SNT-02".to_string(),
            product_id: "ISS_S301SNT02_20220101_20221231_117SICAC_01".to_string(),
            track_id: Some("117".to_string()),
            provider: "TRE-A".to_string(),
            production_date: "20240215".to_string(),
            start_date: "20220101".to_string(),
            end_date: "20221231".to_string(),
            aoi_tag: "SIC".to_string(),
            crs: "EPSG:4326".to_string(),
        }
    }

    #[test]
    fn sidecar_carries_product_and_constituents() {
        let constituents = vec![Constituent {
            gsp_id: "S301SNT02".to_string(),
            product_id: "ISS_S301SNT02_20220101_20221231_117A0266IW1_01".to_string(),
            member_tag: "burst_id",
            member_id: "117A0266IW1".to_string(),
        }];
        let root = build_sidecar(
            &sample_meta(),
            (12.0, 36.0, 15.0, 38.0),
            &[(12.0, 36.0), (15.0, 36.0), (15.0, 38.0), (12.0, 38.0), (12.0, 36.0)],
            &constituents,
        )
        .unwrap();

        let map = flatten_xml(&to_pretty_string(&root).unwrap()).unwrap();
        assert_eq!(map.get("gsp_id").unwrap(), "S301SNT02");
        assert_eq!(map.get("sensor_id").unwrap(), "SNT");
        assert_eq!(map.get("track_id").unwrap(), "117");
        assert_eq!(map.get("bbox").unwrap(), "12 36 15 38");
        assert_eq!(map.get("burst_id").unwrap(), "117A0266IW1");
        assert_eq!(
            map.get("description").unwrap(),
            "Single Geometry Calibrated Deformation."
        );
    }

    #[test]
    fn envelope_is_valid_geojson() {
        let text = envelope_geojson(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0][2][1], 1.0);
    }
}
