#![doc = r#"
IRIDE-GSP: packaging and delivery utilities for IRIDE Lot 2 ground-motion
geospatial products (GSPs).

This crate provides the building blocks behind the `iride-gsp` CLI:

- spatial indexing of Sentinel-1 burst and 2D-deformation tile footprints
  against a named area of interest (`index`),
- merging the per-burst / per-tile deliverables of an index into a single
  zipped product with an XML metadata sidecar (`merge`),
- delivery reports generated from an object-storage bucket listing (`report`),
- repackaging of provider archives into flat delivery zips (`repackage`),
- the static catalogs shared by all of the above: the AOI registry and the
  Lot-2 GSP descriptor tables (`catalog`).

Quick start: merge the bursts of an index file
----------------------------------------------
```rust,no_run
use std::path::Path;
use iride_gsp::{merge, types::OutputFormat};

fn main() -> iride_gsp::Result<()> {
    let archives = merge::merge_bursts(
        Path::new("AOIs_bursts/sicilia.shp"),
        Path::new("/out"),
        None,
        OutputFormat::Csv,
    )?;
    println!("wrote {} delivery archive(s)", archives.len());
    Ok(())
}
```

All pipelines run single-threaded, start to finish, and fail fast: a missing
input, an empty spatial join, or an unknown AOI name surfaces as an
[`Error`] and terminates the run.
"#]

pub mod catalog;
pub mod crs;
pub mod error;
pub mod index;
pub mod io;
pub mod merge;
pub mod repackage;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use types::{CalibrationType, OrbitDirection, Ortho, OutputFormat, ReportFormat, SENSOR};
