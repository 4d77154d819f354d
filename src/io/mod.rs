//! I/O layer for the delivery toolchain.
//! Provides the `xml` metadata reader/writer, the `geodata` point-table
//! reader, `shp` polygon-layer helpers, and `archive` product packaging.
pub mod archive;
pub mod geodata;
pub mod shp;
pub mod xml;

pub use geodata::{dbf_field_names, read_point_table, GeodataError, PointRow, PointTable};
pub use shp::Footprint;
pub use xml::{read_archive_metadata, XmlElement, XmlError, XmlMap};
