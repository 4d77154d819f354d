//! Command Line Interface (CLI) layer for the IRIDE-GSP delivery tools.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that wires the subcommands to the
//! library functionality.
//!
//! If you are embedding the toolchain into another application, prefer using
//! the library modules (`index`, `merge`, `report`, `repackage`) directly.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
