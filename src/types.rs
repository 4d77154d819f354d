//! Shared types and enums used across IRIDE-GSP.
//! Includes the data-file `OutputFormat`, the report `ReportFormat`, and the
//! burst/tile attribute enums `CalibrationType`, `OrbitDirection`, and `Ortho`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Sensor tag used across the first IRIDE release (Sentinel-1).
pub const SENSOR: &str = "SNT";

/// Output format for merged data files.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Geometry-less CSV table
    Csv,
    /// ESRI point shapefile in EPSG:4326
    Shp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Shp => "shp",
        }
    }
}

/// Output format for delivery reports.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated text
    Txt,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Txt => "txt",
        }
    }
}

/// Calibration level of a burst product, decoded from the processing field of
/// its file name. Products that do not carry the level in the file name are
/// `Unspecified`; the XML metadata or product id must be consulted instead.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CalibrationType {
    Basic,
    Calibrated,
    Unspecified,
}

impl CalibrationType {
    /// Attribute value stored in index shapefiles.
    pub fn code(&self) -> &'static str {
        match self {
            CalibrationType::Basic => "B",
            CalibrationType::Calibrated => "C",
            CalibrationType::Unspecified => "None",
        }
    }

    /// Suffix appended to merged-product names.
    pub fn suffix(&self) -> &'static str {
        match self {
            CalibrationType::Basic => "B",
            CalibrationType::Calibrated => "C",
            CalibrationType::Unspecified => "",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(CalibrationType::Basic),
            "C" => Some(CalibrationType::Calibrated),
            "None" => Some(CalibrationType::Unspecified),
            _ => None,
        }
    }

    /// Decode from the processing field of a product file name
    /// (5th `_`-separated field, e.g. `117A0266IW1C`).
    pub fn from_processing_field(field: &str) -> Self {
        if field.ends_with('B') {
            CalibrationType::Basic
        } else if field.ends_with('C') {
            CalibrationType::Calibrated
        } else {
            CalibrationType::Unspecified
        }
    }
}

impl std::fmt::Display for CalibrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Orbit direction of a Sentinel-1 acquisition.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OrbitDirection {
    Ascending,
    Descending,
    Unknown,
}

impl OrbitDirection {
    pub fn tag(&self) -> &'static str {
        match self {
            OrbitDirection::Ascending => "A",
            OrbitDirection::Descending => "D",
            OrbitDirection::Unknown => "U",
        }
    }
}

impl std::fmt::Display for OrbitDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Deformation direction of a 2D-deformation tile.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Ortho {
    Vertical,
    EastWest,
}

impl Ortho {
    pub const ALL: [Ortho; 2] = [Ortho::Vertical, Ortho::EastWest];

    pub fn tag(&self) -> &'static str {
        match self {
            Ortho::Vertical => "V",
            Ortho::EastWest => "E",
        }
    }
}

impl std::fmt::Display for Ortho {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
