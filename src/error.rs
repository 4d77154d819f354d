//! Crate-level error type and `Result` alias for stable, structured error
//! handling. Converts underlying I/O, XML, geodata, and bucket errors, and
//! provides semantic variants for the failure modes of the pipelines.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] crate::io::xml::XmlError),

    #[error("Geodata error: {0}")]
    Geodata(#[from] crate::io::geodata::GeodataError),

    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Bucket listing error: {0}")]
    Bucket(#[from] crate::report::bucket::BucketError),

    #[error("Input {0:?} does not exist")]
    MissingInput(PathBuf),

    #[error("AOI `{0}` not found")]
    UnknownAoi(String),

    #[error("Ancillary dataset `{0}` not found")]
    UnknownInputDataset(String),

    #[error("No {what} found covering the selected area of interest")]
    EmptyJoin { what: &'static str },

    #[error("No usable records in index file {0:?}")]
    EmptyIndex(PathBuf),

    #[error("Missing field `{0}`")]
    MissingField(&'static str),

    #[error("Parse error: {0}")]
    Parse(String),
}
