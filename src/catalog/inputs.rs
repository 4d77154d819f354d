//! Citation records for the ancillary EO / non-EO datasets that enter the
//! Lot-2 processing chains. Rendered as `<input>` entries in the `dataset`
//! section of merged-product sidecars.
use crate::error::{Error, Result};
use crate::io::xml::XmlElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDataset {
    Tinitaly10,
    OpenStreetMap,
    CopernicusDem,
}

impl InputDataset {
    /// Resolve a dataset from the names used in the descriptor tables.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "TINITALY" | "Tinitaly" | "Tinitaly-10" => Ok(InputDataset::Tinitaly10),
            "OpenStreetMap" | "OSM" => Ok(InputDataset::OpenStreetMap),
            "Copernicus" | "CopDem" => Ok(InputDataset::CopernicusDem),
            _ => Err(Error::UnknownInputDataset(name.to_string())),
        }
    }

    pub fn input_id(&self) -> &'static str {
        match self {
            InputDataset::Tinitaly10 => "S3-NEO-I01",
            InputDataset::OpenStreetMap => "S3-NEO-I09",
            InputDataset::CopernicusDem => "S3-NEO-I01",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            InputDataset::Tinitaly10 => "Tinitaly-10",
            InputDataset::OpenStreetMap => "OpenStreetMap",
            InputDataset::CopernicusDem => "Cop-DEM - Resolution (m) 30 x 30",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InputDataset::Tinitaly10 => {
                "Tarquini S., I. Isola, M. Favalli, A. Battistini,\
                 G. Dotta (2023). TINITALY, a digital elevation model \
                 of Italy with a 10 meters cell size (Version 1.1). \
                 Istituto Nazionale di Geofisica e Vulcanologia (INGV). \
                 https://doi.org/10.13127/tinitaly/1.1."
            }
            InputDataset::OpenStreetMap => {
                "OpenStreetMap (Version 1.0). OpenStreetMap \
                 Foundation. https://doi.org/10.13127/osm/1.0."
            }
            InputDataset::CopernicusDem => {
                "Copernicus Digital Elevation Model (DEM) (Version 1.0). \
                 https://spacedata.copernicus.eu/collections/\
                 copernicus-digital-elevation-model."
            }
        }
    }

    /// Render the `<input>` sidecar entry for this dataset.
    pub fn to_xml(&self) -> XmlElement {
        let mut input = XmlElement::new("input");
        input.leaf("input_id", self.input_id());
        input.leaf("version", self.version());
        input.leaf("description", self.description());
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve() {
        assert_eq!(
            InputDataset::from_name("Tinitaly-10").unwrap(),
            InputDataset::Tinitaly10
        );
        assert_eq!(
            InputDataset::from_name("OSM").unwrap(),
            InputDataset::OpenStreetMap
        );
        assert_eq!(
            InputDataset::from_name("CopDem").unwrap(),
            InputDataset::CopernicusDem
        );
        assert!(InputDataset::from_name("SRTM").is_err());
    }

    #[test]
    fn xml_entry_carries_the_catalog_id() {
        let el = InputDataset::OpenStreetMap.to_xml();
        assert_eq!(el.name, "input");
        assert_eq!(el.children[0].text.as_deref(), Some("S3-NEO-I09"));
        assert_eq!(el.children[1].text.as_deref(), Some("OpenStreetMap"));
    }
}
