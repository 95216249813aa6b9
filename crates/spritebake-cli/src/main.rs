//! spritebake CLI - Bake 3D model animations into 2D sprite sheets
//!
//! Renders evenly spaced frames of a model's animation with headless Blender,
//! optionally strips their backgrounds with rembg, and tiles them into a
//! single PNG.

use clap::Parser;
use std::process::ExitCode;

use spritebake_cli::cli_args::Cli;
use spritebake_cli::{commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match commands::bake::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
