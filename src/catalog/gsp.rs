//! GSP descriptor tables for the IRIDE Service Segment - Lot 2.
//!
//! Product codes come in two spellings that alias the same product: the
//! dashed form used in delivery paths (`S3-01-SNT-01`) and the compact form
//! used in product file names (`S301SNT01`). Both parse to a [`ProductCode`],
//! and every lookup matches on the canonical code rather than enumerating the
//! aliases.
use crate::catalog::inputs::InputDataset;

/// Mission / data-source segment of a product code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mission {
    /// Sentinel-1
    Snt,
    /// COSMO-SkyMed
    Csm,
    /// SAOCOM
    Sao,
    /// Cultural heritage service
    Cha,
    /// Earthquake service
    Etq,
    /// Volcano service
    Vol,
    /// Landslide (on-demand) service
    Ond,
}

impl Mission {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "SNT" => Some(Mission::Snt),
            "CSM" => Some(Mission::Csm),
            "SAO" => Some(Mission::Sao),
            "CHA" => Some(Mission::Cha),
            "ETQ" => Some(Mission::Etq),
            "VOL" => Some(Mission::Vol),
            "OND" => Some(Mission::Ond),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mission::Snt => "SNT",
            Mission::Csm => "CSM",
            Mission::Sao => "SAO",
            Mission::Cha => "CHA",
            Mission::Etq => "ETQ",
            Mission::Vol => "VOL",
            Mission::Ond => "OND",
        }
    }
}

/// Canonical form of a Lot-2 product code, e.g. `S3-01-SNT-02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCode {
    /// Service number within SE-S3 (01..07)
    pub service: u8,
    pub mission: Mission,
    /// Product index within the service
    pub product: u8,
}

impl ProductCode {
    /// Parse either spelling of a product code. Returns `None` for anything
    /// that is not a well-formed `S3` code.
    pub fn parse(code: &str) -> Option<Self> {
        let (service, mission, product) = if code.contains('-') {
            // S3-01-SNT-02
            let mut parts = code.split('-');
            if parts.next()? != "S3" {
                return None;
            }
            let service = parts.next()?;
            let mission = parts.next()?;
            let product = parts.next()?;
            if parts.next().is_some() {
                return None;
            }
            (service.to_string(), mission.to_string(), product.to_string())
        } else {
            // S301SNT02
            if code.len() != 9 || !code.starts_with("S3") {
                return None;
            }
            (code[2..4].to_string(), code[4..7].to_string(), code[7..9].to_string())
        };

        Some(ProductCode {
            service: service.parse().ok()?,
            mission: Mission::from_str(&mission)?,
            product: product.parse().ok()?,
        })
    }

    /// Compact spelling, `S301SNT02`.
    pub fn compact(&self) -> String {
        format!("S3{:02}{}{:02}", self.service, self.mission.as_str(), self.product)
    }

    /// Dashed spelling, `S3-01-SNT-02`.
    pub fn dashed(&self) -> String {
        format!("S3-{:02}-{}-{:02}", self.service, self.mission.as_str(), self.product)
    }

    /// Whether the mission segment is valid for the service it appears in.
    /// Services 01, 02 and 04 are delivered per SAR mission; the others carry
    /// a fixed service mnemonic.
    fn is_cataloged(&self) -> bool {
        match self.service {
            1 | 2 | 4 => matches!(self.mission, Mission::Snt | Mission::Csm | Mission::Sao),
            3 => self.mission == Mission::Cha,
            5 => self.mission == Mission::Etq,
            6 => self.mission == Mission::Vol,
            7 => self.mission == Mission::Ond,
            _ => false,
        }
    }
}

impl std::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dashed())
    }
}

/// Human-readable description of a GSP, or `""` for unknown codes.
pub fn description(gsp_id: &str) -> &'static str {
    let code = match ProductCode::parse(gsp_id) {
        Some(c) if c.is_cataloged() => c,
        _ => return "",
    };
    match (code.service, code.product) {
        (1, 1) => "Single Geometry Deformation.",
        (1, 2) => "Single Geometry Calibrated Deformation.",
        (1, 3) => "2D Deformation East-West and Vertical Components.",
        (1, 4) => "Active Displacement Areas.",
        (2, 2) => "LOS velocities projected along the maximum slope.",
        (2, 3) => "Spatial Anomaly maps.",
        (2, 4) => "Temporal Anomaly Maps.",
        (2, 5) => "Automatic identification of unstable slopes.",
        (3, 1) => "InSAR Statistical Indexes.",
        (3, 2) => "3D Velocity Decomposition.",
        (3, 3) => {
            "Identification of Differential Deformation over Cultural Heritage Structures."
        }
        (3, 4) => "Temporal Anomaly Maps.",
        (3, 5) => "Intersection of spatio-temporal anomalies with exposed Cultural heritage.",
        (4, 2) => "Active deformation areas close to infrastructures.",
        (4, 3) => "Anomalous Deformation Areas based on acceleration analysis.",
        (5, 1) => "Single geometry calibrated deformations resampled on a medium resolution grid.",
        (5, 2) => "2D calibrated deformations: East-West and Vertical components.",
        (5, 3) => "Spatial clusterization based on temporal displacement models.",
        (5, 4) => "DInSAR-based co-seismic deformation.",
        (5, 5) => "Strategic assets single geometry deformations: non-calibrated and calibrated.",
        (5, 6) => "Strategic assets 2D deformations: East-West and vertical components.",
        (5, 7) => "Strategic assets PS/DS-based temporal anomalies.",
        (6, 2) => "Active Deformation Areas Perimeter.",
        (6, 3) => "Identification of Differential Deformation over Volcanic Areas.",
        (6, 4) => "Temporal Anomaly Maps.",
        (6, 5) => "Multi-sensors and multi-geometry Data Fusion.",
        (6, 6) => "Change Detection Maps.",
        (6, 7) => "InSAR Coherence Maps.",
        (6, 8) => "Intersection of spatio-temporal anomalies with exposed assets.",
        (7, 1) => "Single geometry calibrated deformations extracted for the period of interest.",
        (7, 2) => "2D calibrated deformations: East-West and Vertical components.",
        (7, 3) => "Landslide Spatial Anomalies.",
        (7, 4) => "Landslide Spatio-Temporal Anomalies.",
        (7, 5) => "Area of influence of active areas from spatial anomalies.",
        (7, 6) => "LOS velocities projected along the maximum slope.",
        (7, 7) => "GNSS time series projected along the PS/DS LOS.",
        (7, 8) => "Volcanic Spatial Statistics.",
        (7, 9) => "InSAR Coherence Maps.",
        _ => "",
    }
}

/// Ancillary EO / non-EO datasets used to generate a GSP.
pub fn input_datasets(gsp_id: &str) -> &'static [InputDataset] {
    const COPDEM: &[InputDataset] = &[InputDataset::CopernicusDem];
    const COPDEM_OSM: &[InputDataset] =
        &[InputDataset::CopernicusDem, InputDataset::OpenStreetMap];
    const TINITALY: &[InputDataset] = &[InputDataset::Tinitaly10];
    const TIN_OSM_DEM: &[InputDataset] = &[
        InputDataset::Tinitaly10,
        InputDataset::OpenStreetMap,
        InputDataset::CopernicusDem,
    ];

    let code = match ProductCode::parse(gsp_id) {
        Some(c) if c.is_cataloged() => c,
        _ => return &[],
    };
    match (code.service, code.product) {
        (1, 1) | (1, 2) | (1, 3) => COPDEM,
        (1, 4) => COPDEM_OSM,
        (2, 2) | (2, 4) | (2, 5) => TINITALY,
        (4, 2) | (4, 3) => TIN_OSM_DEM,
        _ => &[],
    }
}

/// Delivery data-type description of a GSP, or `"NA"` for unknown codes.
pub fn data_type(gsp_id: &str) -> &'static str {
    let code = match ProductCode::parse(gsp_id) {
        Some(c) if c.is_cataloged() => c,
        _ => return "NA",
    };
    match (code.service, code.product) {
        (1, 1) | (1, 2) | (1, 3)
        | (2, 2) | (2, 4) | (2, 5)
        | (3, 2) | (3, 4)
        | (4, 2) | (4, 3)
        | (5, 1) | (5, 2) | (5, 3) | (5, 6) | (5, 7)
        | (6, 2) | (6, 4) | (6, 5)
        | (7, 1) | (7, 2) | (7, 7) => "ESRI Shapefile (Geometry: Points) + CSV",
        (1, 4) | (3, 1) | (3, 3) | (3, 5) | (6, 8) | (7, 6) | (7, 8) => {
            "ESRI Shapefile (Geometry: Polygon)"
        }
        (5, 4) | (6, 6) | (6, 7) => "GeoTiff disp. Map + XML",
        (7, 3) | (7, 4) | (7, 5) | (7, 9) => "ESRI Shapefile (Geometry: Polygon / Points) + CSV",
        _ => "NA",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_spellings_parse_to_the_same_code() {
        let dashed = ProductCode::parse("S3-01-SNT-02").unwrap();
        let compact = ProductCode::parse("S301SNT02").unwrap();
        assert_eq!(dashed, compact);
        assert_eq!(dashed.compact(), "S301SNT02");
        assert_eq!(compact.dashed(), "S3-01-SNT-02");
    }

    #[test]
    fn malformed_codes_do_not_parse() {
        assert!(ProductCode::parse("S4-01-SNT-02").is_none());
        assert!(ProductCode::parse("S301XXX02").is_none());
        assert!(ProductCode::parse("S301SNT").is_none());
        assert!(ProductCode::parse("").is_none());
    }

    #[test]
    fn descriptions_cover_both_spellings() {
        assert_eq!(description("S3-01-SNT-01"), "Single Geometry Deformation.");
        assert_eq!(description("S301CSM01"), "Single Geometry Deformation.");
        assert_eq!(
            description("S301SAO02"),
            "Single Geometry Calibrated Deformation."
        );
        assert_eq!(description("S303CHA02"), "3D Velocity Decomposition.");
        assert_eq!(description("S3-07-OND-08"), "Volcanic Spatial Statistics.");
    }

    #[test]
    fn mission_must_match_the_service_family() {
        // Service 03 is delivered under the CHA mnemonic only.
        assert_eq!(description("S3-03-SNT-01"), "");
        assert_eq!(description("S3-01-CHA-01"), "");
    }

    #[test]
    fn input_dataset_tables() {
        assert_eq!(
            input_datasets("S3-01-SNT-01"),
            &[InputDataset::CopernicusDem]
        );
        assert_eq!(
            input_datasets("S301SNT04"),
            &[InputDataset::CopernicusDem, InputDataset::OpenStreetMap]
        );
        assert_eq!(input_datasets("S3-02-SNT-04"), &[InputDataset::Tinitaly10]);
        assert_eq!(
            input_datasets("S304CSM03"),
            &[
                InputDataset::Tinitaly10,
                InputDataset::OpenStreetMap,
                InputDataset::CopernicusDem
            ]
        );
        assert!(input_datasets("S3-06-VOL-02").is_empty());
    }

    #[test]
    fn data_type_tables() {
        assert_eq!(
            data_type("S3-01-SNT-01"),
            "ESRI Shapefile (Geometry: Points) + CSV"
        );
        assert_eq!(data_type("S303CHA01"), "ESRI Shapefile (Geometry: Polygon)");
        assert_eq!(data_type("S3-05-ETQ-04"), "GeoTiff disp. Map + XML");
        assert_eq!(
            data_type("S307OND03"),
            "ESRI Shapefile (Geometry: Polygon / Points) + CSV"
        );
        assert_eq!(data_type("S3-02-SNT-03"), "NA");
        assert_eq!(data_type("not-a-code"), "NA");
    }
}
