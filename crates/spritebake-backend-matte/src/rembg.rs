//! `rembg` subprocess adapter.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{MatteError, MatteResult};

/// Configuration for locating and invoking `rembg`.
#[derive(Debug, Clone, Default)]
pub struct RembgConfig {
    /// Explicit path to the `rembg` executable.
    pub rembg_path: Option<PathBuf>,
    /// Model name passed as `-m` (e.g. `u2net`, `isnet-anime`).
    pub model: Option<String>,
}

impl RembgConfig {
    /// Sets the `rembg` executable path.
    pub fn rembg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rembg_path = Some(path.into());
        self
    }

    /// Sets the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Removes frame backgrounds in place.
pub trait BackgroundRemover {
    /// Replaces the image at `frame` with a background-stripped version of
    /// the same dimensions.
    fn remove_background(&self, frame: &Path) -> MatteResult<()>;
}

/// A located `rembg` installation.
#[derive(Debug, Clone)]
pub struct Rembg {
    executable: PathBuf,
    model: Option<String>,
}

impl Rembg {
    /// Locates `rembg`: configured path, then `REMBG_PATH`, then `PATH`.
    pub fn locate(config: &RembgConfig) -> MatteResult<Self> {
        let executable = match (&config.rembg_path, std::env::var_os("REMBG_PATH")) {
            (Some(path), _) => resolve_explicit(path)?,
            (None, Some(env_path)) => resolve_explicit(Path::new(&env_path))?,
            (None, None) => {
                which::which("rembg").map_err(|_| MatteError::RembgNotFound { searched: None })?
            }
        };

        tracing::debug!(executable = %executable.display(), model = ?config.model, "located rembg");

        Ok(Self {
            executable,
            model: config.model.clone(),
        })
    }

    /// Path to the `rembg` executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// `rembg i [-m MODEL] <input> <output>`
    fn build_command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("i");
        if let Some(ref model) = self.model {
            cmd.arg("-m").arg(model);
        }
        cmd.arg(input).arg(output);
        cmd
    }
}

impl BackgroundRemover for Rembg {
    fn remove_background(&self, frame: &Path) -> MatteResult<()> {
        let expected =
            image::image_dimensions(frame).map_err(|e| MatteError::image(frame, e))?;

        let dir = frame.parent().unwrap_or_else(|| Path::new("."));
        let matted = tempfile::Builder::new()
            .prefix("matte_")
            .suffix(".png")
            .tempfile_in(dir)?
            .into_temp_path();

        let mut cmd = self.build_command(frame, &matted);
        cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        tracing::debug!(command = ?cmd, "spawning rembg");

        let output = cmd.output().map_err(MatteError::SpawnFailed)?;
        if !output.status.success() {
            return Err(MatteError::ProcessFailed {
                path: frame.to_path_buf(),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if std::fs::metadata(&matted).map(|m| m.len()).unwrap_or(0) == 0 {
            return Err(MatteError::OutputNotFound {
                path: frame.to_path_buf(),
            });
        }

        let actual =
            image::image_dimensions(&matted).map_err(|e| MatteError::image(frame, e))?;
        if actual != expected {
            return Err(MatteError::DimensionMismatch {
                path: frame.to_path_buf(),
                expected,
                actual,
            });
        }

        // The temp file is owner-only; give the result the frame's permissions.
        std::fs::set_permissions(&matted, std::fs::metadata(frame)?.permissions())?;
        matted.persist(frame).map_err(|e| MatteError::Io(e.error))?;
        Ok(())
    }
}

fn resolve_explicit(path: &Path) -> MatteResult<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    which::which(path).map_err(|_| MatteError::RembgNotFound {
        searched: Some(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_command() {
        let rembg = Rembg {
            executable: PathBuf::from("rembg"),
            model: Some("isnet-anime".to_string()),
        };
        let cmd = rembg.build_command(Path::new("in.png"), Path::new("out.png"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["i", "-m", "isnet-anime", "in.png", "out.png"]);

        let rembg = Rembg {
            executable: PathBuf::from("rembg"),
            model: None,
        };
        let cmd = rembg.build_command(Path::new("in.png"), Path::new("out.png"));
        assert_eq!(cmd.get_args().count(), 3);
    }

    #[test]
    fn test_locate_missing_explicit_path() {
        let config = RembgConfig::default().rembg_path("/this/does/not/exist/rembg");
        let err = Rembg::locate(&config).unwrap_err();
        match err {
            MatteError::RembgNotFound { searched } => {
                assert_eq!(searched, Some(PathBuf::from("/this/does/not/exist/rembg")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
