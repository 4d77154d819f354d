use std::time::Instant;

use tracing::info;

use iride_gsp::report::bucket::{list_bucket, read_listing_file};
use iride_gsp::{index, merge, repackage, report};

use super::args::{CliArgs, Command};
use super::errors::AppError;

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let started = Instant::now();
    match args.command {
        Command::IndexBursts {
            burst_file,
            aoi,
            burst_dir,
        } => {
            let out = index::index_bursts(&burst_file, &aoi, &burst_dir)
                .map_err(AppError::Lib)?;
            info!("Index saved to {:?}", out);
        }
        Command::IndexTiles {
            tile_file,
            aoi,
            tile_dir,
        } => {
            let out = index::index_tiles(&tile_file, &aoi, &tile_dir).map_err(AppError::Lib)?;
            info!("Index saved to {:?}", out);
        }
        Command::MergeBursts {
            index_file,
            out_dir,
            clip_aoi,
            format,
        } => {
            let archives =
                merge::merge_bursts(&index_file, &out_dir, clip_aoi.as_deref(), format)
                    .map_err(AppError::Lib)?;
            info!("Wrote {} delivery archive(s)", archives.len());
        }
        Command::MergeTiles {
            index_file,
            out_dir,
            clip_aoi,
            format,
        } => {
            let archives =
                merge::merge_tiles(&index_file, &out_dir, clip_aoi.as_deref(), format)
                    .map_err(AppError::Lib)?;
            info!("Wrote {} delivery archive(s)", archives.len());
        }
        Command::BucketReport {
            bucket,
            sub_dir,
            out_dir,
            format,
            listing,
        } => {
            let keys = match (listing, bucket) {
                (Some(file), _) => read_listing_file(&file).map_err(iride_gsp::Error::from)?,
                (None, Some(name)) => list_bucket(&name).map_err(iride_gsp::Error::from)?,
                (None, None) => {
                    return Err(AppError::MissingArgument {
                        arg: "<bucket> or --listing".to_string(),
                    }
                    .into());
                }
            };
            let rows = report::build_report(&keys, sub_dir.as_deref()).map_err(AppError::Lib)?;
            let out = report::write_report(&rows, &out_dir, format).map_err(AppError::Lib)?;
            info!("Report with {} row(s) saved to {:?}", rows.len(), out);
        }
        Command::Repackage { in_dir, out_dir } => {
            let archives = repackage::repackage_dir(&in_dir, &out_dir).map_err(AppError::Lib)?;
            info!("Repackaged {} archive(s)", archives.len());
        }
    }
    info!("Computation time: {:.2?}", started.elapsed());
    Ok(())
}
