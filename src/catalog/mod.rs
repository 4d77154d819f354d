//! Static catalogs of the IRIDE Service Segment - Lot 2.
//!
//! The registry of known areas of interest (`aoi`), the GSP descriptor tables
//! mapping product codes to descriptions, delivery formats and ancillary
//! inputs (`gsp`), and the citation records for those ancillary datasets
//! (`inputs`). These are lookup data, fixed per release; nothing here touches
//! the filesystem.
pub mod aoi;
pub mod gsp;
pub mod inputs;

pub use aoi::{get_aoi_info, AoiInfo};
pub use gsp::{data_type, description, input_datasets, ProductCode};
pub use inputs::InputDataset;
