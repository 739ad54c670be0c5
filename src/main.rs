//! mason CLI entry point
//!
//! Usage: mason <COMMAND>
//!
//! Commands:
//!   build   Compile assets, fingerprint them, and write the manifest
//!   clean   Remove the output directory

use anyhow::Result;

fn main() -> Result<()> {
    mason::cli::run()
}
