use clap::{Parser, Subcommand};
use std::path::PathBuf;

use iride_gsp::types::{OutputFormat, ReportFormat};

#[derive(Parser)]
#[command(name = "iride-gsp", version, about = "IRIDE Lot-2 GSP delivery tools")]
pub struct CliArgs {
    /// Enable logging
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Index the Sentinel-1 bursts covering an area of interest
    IndexBursts {
        /// Path to the Sentinel-1 burst footprint shapefile
        burst_file: PathBuf,

        /// Path to the area of interest shapefile
        aoi: PathBuf,

        /// Directory containing the burst archives
        #[arg(short = 'D', long, default_value = ".")]
        burst_dir: PathBuf,
    },

    /// Index the 2D-deformation tiles covering an area of interest
    IndexTiles {
        /// Path to the tile footprint shapefile
        tile_file: PathBuf,

        /// Path to the area of interest shapefile
        aoi: PathBuf,

        /// Directory containing the tile archives
        #[arg(short = 'T', long, default_value = ".")]
        tile_dir: PathBuf,
    },

    /// Merge the bursts of an AOI index into per-track products
    MergeBursts {
        /// Index file listing the bursts available over the AOI
        index_file: PathBuf,

        /// Output directory where the results will be saved
        #[arg(short = 'D', long, default_value = ".")]
        out_dir: PathBuf,

        /// Clip the output to the AOI
        #[arg(short = 'C', long)]
        clip_aoi: Option<PathBuf>,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Merge the tiles of an AOI index into per-direction products
    MergeTiles {
        /// Index file listing the tiles available over the AOI
        index_file: PathBuf,

        /// Output directory where the results will be saved
        #[arg(short = 'D', long, default_value = ".")]
        out_dir: PathBuf,

        /// Clip the output to the AOI
        #[arg(short = 'C', long)]
        clip_aoi: Option<PathBuf>,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Build the delivery report from a bucket listing
    BucketReport {
        /// Name of the delivery bucket
        bucket: Option<String>,

        /// Keep only keys under this sub-directory
        #[arg(short = 'S', long)]
        sub_dir: Option<String>,

        /// Output directory
        #[arg(short = 'O', long, default_value = ".")]
        out_dir: PathBuf,

        /// Report format
        #[arg(short = 'F', long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,

        /// Read the keys from a local newline-delimited file instead of
        /// querying the bucket
        #[arg(long)]
        listing: Option<PathBuf>,
    },

    /// Re-zip nested provider archives flat under the product name
    Repackage {
        /// Input directory containing the provider archives
        in_dir: PathBuf,

        /// Output directory where the results will be saved
        #[arg(short = 'D', long, default_value = ".")]
        out_dir: PathBuf,
    },
}
