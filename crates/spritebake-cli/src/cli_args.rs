//! CLI argument definitions for the spritebake command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use spritebake_backend_blender::OrchestratorConfig;
use spritebake_backend_matte::RembgConfig;
use spritebake_spec::{
    BakeOptions, MatteMode, RangeOverride, DEFAULT_FRAME_COUNT, DEFAULT_FRAME_SIZE,
};

/// spritebake - Bake 3D animations into 2D sprite sheets
#[derive(Debug, Parser)]
#[command(name = "spritebake")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example: spritebake model.blend -o sprite.png --frames 16 --remove-bg")]
pub struct Cli {
    /// 3D model or animation file (.blend, .fbx, .glb, .gltf)
    pub model: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of frames to render
    #[arg(long, default_value_t = DEFAULT_FRAME_COUNT)]
    pub frames: u32,

    /// Frame size in pixels (frames are square)
    #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
    pub size: u32,

    /// Grid columns (default: ceil(sqrt(frames)))
    #[arg(long)]
    pub cols: Option<u32>,

    /// First animation frame (default: scene start)
    #[arg(long, allow_hyphen_values = true)]
    pub frame_start: Option<i32>,

    /// Last animation frame (default: scene end)
    #[arg(long, allow_hyphen_values = true)]
    pub frame_end: Option<i32>,

    /// Remove frame backgrounds with rembg
    #[arg(long)]
    pub remove_bg: bool,

    /// Only run rembg on frames whose background is not already transparent
    /// (implies --remove-bg)
    #[arg(long)]
    pub bg_detect: bool,

    /// rembg model name (e.g. u2net, isnet-anime)
    #[arg(long, value_name = "NAME")]
    pub rembg_model: Option<String>,

    /// Keep individual frames in <output stem>_frames/ next to the output
    #[arg(long)]
    pub keep_frames: bool,

    /// Keep floor and background materials as they are
    #[arg(long)]
    pub no_bg_neutralize: bool,

    /// Path to the Blender executable (default: BLENDER_PATH, then PATH)
    #[arg(long, value_name = "PATH")]
    pub blender: Option<PathBuf>,

    /// Render script to run inside Blender (default: built-in)
    #[arg(long, value_name = "PATH")]
    pub render_script: Option<PathBuf>,

    /// Path to the rembg executable (default: REMBG_PATH, then PATH)
    #[arg(long, value_name = "PATH")]
    pub rembg: Option<PathBuf>,

    /// Output a machine-readable JSON summary (no colored output)
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the bake options described by the arguments.
    pub fn bake_options(&self) -> BakeOptions {
        let matte = if self.bg_detect {
            Some(MatteMode::Auto)
        } else if self.remove_bg {
            Some(MatteMode::All)
        } else {
            None
        };

        BakeOptions {
            model: self.model.clone(),
            output: self.output.clone(),
            frame_count: self.frames,
            frame_size: self.size,
            columns: self.cols,
            range: RangeOverride::new(self.frame_start, self.frame_end),
            matte,
            keep_frames: self.keep_frames,
            neutralize_bg: !self.no_bg_neutralize,
        }
    }

    /// Blender lookup and script overrides.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::default();
        if let Some(path) = &self.blender {
            config = config.blender_path(path);
        }
        if let Some(path) = &self.render_script {
            config = config.script_path(path);
        }
        config
    }

    /// rembg lookup and model overrides.
    pub fn rembg_config(&self) -> RembgConfig {
        let mut config = RembgConfig::default();
        if let Some(path) = &self.rembg {
            config = config.rembg_path(path);
        }
        if let Some(model) = &self.rembg_model {
            config = config.model(model);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["spritebake", "walk.blend", "-o", "walk.png"]).unwrap();
        let options = cli.bake_options();

        assert_eq!(options, BakeOptions::new("walk.blend", "walk.png"));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.json);
        assert!(cli.orchestrator_config().blender_path.is_none());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "spritebake",
            "run.fbx",
            "--output",
            "out/run.png",
            "--frames",
            "16",
            "--size",
            "256",
            "--cols",
            "4",
            "--frame-start",
            "-10",
            "--frame-end",
            "30",
            "--remove-bg",
            "--rembg-model",
            "isnet-anime",
            "--keep-frames",
            "--no-bg-neutralize",
            "--blender",
            "/opt/blender/blender",
            "--rembg",
            "/usr/local/bin/rembg",
            "--json",
            "-vv",
        ])
        .unwrap();
        let options = cli.bake_options();

        assert_eq!(options.frame_count, 16);
        assert_eq!(options.frame_size, 256);
        assert_eq!(options.columns, Some(4));
        assert_eq!(options.range, RangeOverride::new(Some(-10), Some(30)));
        assert_eq!(options.matte, Some(MatteMode::All));
        assert!(options.keep_frames);
        assert!(!options.neutralize_bg);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.orchestrator_config().blender_path,
            Some(PathBuf::from("/opt/blender/blender"))
        );

        let rembg = cli.rembg_config();
        assert_eq!(rembg.rembg_path, Some(PathBuf::from("/usr/local/bin/rembg")));
        assert_eq!(rembg.model.as_deref(), Some("isnet-anime"));
    }

    #[test]
    fn test_bg_detect_implies_remove_bg() {
        let cli =
            Cli::try_parse_from(["spritebake", "a.glb", "-o", "a.png", "--bg-detect"]).unwrap();
        assert_eq!(cli.bake_options().matte, Some(MatteMode::Auto));
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["spritebake", "a.blend"]).is_err());
    }
}
