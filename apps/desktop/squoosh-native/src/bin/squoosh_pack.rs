//! Packs a built frontend into the obfuscated archive the host serves in
//! packaged mode.

use squoosh_native::error::HostError;
use squoosh_native::launch;
use squoosh_native::logger::initialize as LoggerInitialize;

use bridge_core::ASSET_SALT;
use bridge_core::pack::pack_directory;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(
    name = "squoosh-pack",
    version,
    about = "Pack a built Squoosh frontend into squoosh.pak",
    long_about = "Walks the frontend build directory and writes every file into a zip archive \
                  under a salted hash of its path. Already-compressed formats and files under \
                  256 bytes are stored; everything else is deflated at level 9."
)]
struct Cli {
    /// Frontend build directory
    #[arg(value_name = "BUILD_DIR", default_value = "squoosh/build")]
    source: PathBuf,

    /// Archive to write (overwritten)
    #[arg(short, long, value_name = "ARCHIVE", default_value = "squoosh.pak")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Packing failed: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), HostError> {
    LoggerInitialize(&launch::log_dir()?)?;
    info!("Packing {} into {}", cli.source.display(), cli.output.display());

    let report = pack_directory(&cli.source, &cli.output, ASSET_SALT)?;
    info!("Packed {} files, {} bytes", report.entries.len(), report.archive_size);
    Ok(())
}
