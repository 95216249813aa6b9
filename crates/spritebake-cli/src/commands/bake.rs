//! Bake command implementation
//!
//! Renders a model's animation and writes the sprite sheet, reporting either
//! colored progress lines or a JSON summary.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use spritebake_backend_blender::BlenderRenderer;
use spritebake_backend_matte::{BackgroundRemover, FrameCoverage, Rembg};
use std::process::ExitCode;

use crate::cli_args::Cli;
use crate::pipeline::{check_inputs, run_bake, BakeEvent, BakeOutcome, BakeResult};

/// JSON document printed on stdout with `--json`.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a BakeOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Debug, Serialize)]
struct JsonError {
    stage: &'static str,
    code: &'static str,
    message: String,
}

/// Run the bake command
///
/// # Returns
/// Exit code 0 on success. Failures are returned as errors prefixed with the
/// failing stage.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let result = if cli.json {
        bake(cli, |_| {})
    } else {
        println!("{} {}", "Baking:".cyan().bold(), cli.model.display());
        println!("{} {}", "Output:".cyan().bold(), cli.output.display());
        bake(cli, print_event)
    };

    match result {
        Ok(outcome) => {
            if cli.json {
                print_json(&JsonOutput {
                    ok: true,
                    outcome: Some(&outcome),
                    error: None,
                })?;
            } else {
                print_summary(&outcome);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if cli.json {
                print_json(&JsonOutput {
                    ok: false,
                    outcome: None,
                    error: Some(JsonError {
                        stage: e.stage(),
                        code: e.code(),
                        message: e.to_string(),
                    }),
                })?;
            }
            Err(anyhow::anyhow!("{}: {}", e.stage(), e))
        }
    }
}

fn bake(cli: &Cli, on_event: impl FnMut(BakeEvent<'_>)) -> BakeResult<BakeOutcome> {
    let options = cli.bake_options();
    let format = check_inputs(&options)?;

    // Locate rembg before rendering so a missing install fails fast.
    let rembg = match options.matte {
        Some(_) => Some(Rembg::locate(&cli.rembg_config())?),
        None => None,
    };
    if let Some(rembg) = &rembg {
        tracing::info!(rembg = %rembg.executable().display(), "using rembg");
    }

    let renderer = BlenderRenderer::new(cli.orchestrator_config());
    run_bake(
        &options,
        format,
        &renderer,
        rembg.as_ref().map(|r| r as &dyn BackgroundRemover),
        on_event,
    )
}

fn print_event(event: BakeEvent<'_>) {
    match event {
        BakeEvent::RangeResolved { range, probed } => {
            let source = if probed { "scene" } else { "override" };
            println!("{} {} ({})", "Range:".cyan().bold(), range, source.dimmed());
        }
        BakeEvent::Planned { selection, layout } => {
            let frames = selection.unique_indices();
            println!(
                "{} {} {:?}",
                "Frames:".cyan().bold(),
                frames.len(),
                frames
            );
            if selection.is_collapsed() {
                println!(
                    "  {} range has fewer frames than requested ({}), rendering {}",
                    "!".yellow(),
                    selection.indices().len(),
                    frames.len()
                );
            }
            println!(
                "{} {}x{} cells of {}px ({}x{})",
                "Layout:".cyan().bold(),
                layout.columns,
                layout.rows,
                layout.cell_size,
                layout.width(),
                layout.height()
            );
            println!("\n{}", "Rendering frames...".dimmed());
        }
        BakeEvent::FrameRendered { frame, total } => {
            println!(
                "  {} frame {} ({}/{})",
                "+".green(),
                frame.frame,
                frame.sequence + 1,
                total
            );
        }
        BakeEvent::FrameMatted {
            index,
            total,
            coverage,
        } => {
            if index == 0 {
                println!("\n{}", "Removing backgrounds...".dimmed());
            }
            let status = match coverage {
                FrameCoverage::NeedsMatte => "matted".green(),
                FrameCoverage::Transparent => "already transparent".dimmed(),
                FrameCoverage::Empty => "empty, cleared".yellow(),
            };
            println!("  {} frame {}/{} {}", "+".green(), index + 1, total, status);
        }
        BakeEvent::SheetWritten { sheet } => {
            println!(
                "\n{} {} ({}x{})",
                "Saved:".cyan().bold(),
                sheet.path.display(),
                sheet.width,
                sheet.height
            );
        }
        BakeEvent::FramesKept { dir, count } => {
            println!(
                "{} {} frame(s) in {}",
                "Frames kept:".cyan().bold(),
                count,
                dir.display()
            );
        }
    }
}

fn print_summary(outcome: &BakeOutcome) {
    println!("{} {}", "Hash:".dimmed(), outcome.hash);
    println!(
        "\n{} Baked {} frame(s) in {}ms",
        "SUCCESS".green().bold(),
        outcome.frames.len(),
        outcome.duration_ms
    );
}

fn print_json(output: &JsonOutput<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}
