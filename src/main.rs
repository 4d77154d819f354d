//! IRIDE-GSP CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch to the
//! requested delivery tool, and exit with appropriate status.
//! For programmatic use, prefer the library modules (`iride_gsp::index`,
//! `iride_gsp::merge`, `iride_gsp::report`, `iride_gsp::repackage`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
