use std::path::PathBuf;

use axum::async_trait;
use ctrltk_core::{Frame, ImageFormat, Resolution};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;
use uuid::Uuid;

/// Failure raised by a capture attempt. Surfaces to clients as a plain 500;
/// the detail only feeds logs.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}")]
    Tool {
        tool: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("unreadable capture artifact: {0}")]
    Artifact(std::io::Error),
    #[error("unparseable display geometry")]
    Geometry,
}

/// Single-method seam over the host's capture mechanism.
#[async_trait]
pub trait ScreenCapturer: Send + Sync {
    /// Take one fresh screenshot and report the host's true resolution
    /// alongside the bytes.
    async fn capture(&self, format: ImageFormat) -> Result<Frame, CaptureError>;
}

/// Production capturer driving `scrot`. The underlying tool writes to a file,
/// so every invocation gets its own uuid-named artifact; concurrent captures
/// never share a path.
pub struct ScrotCapturer {
    scratch_dir: PathBuf,
}

impl ScrotCapturer {
    pub fn new() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
        }
    }

    pub fn with_scratch_dir(scratch_dir: PathBuf) -> Self {
        Self { scratch_dir }
    }

    /// Host resolution via `xdotool getdisplaygeometry` ("<width> <height>").
    async fn probe_resolution(&self) -> Result<Resolution, CaptureError> {
        let output = Command::new("xdotool")
            .arg("getdisplaygeometry")
            .output()
            .await
            .map_err(|source| CaptureError::Spawn {
                tool: "xdotool",
                source,
            })?;
        if !output.status.success() {
            return Err(CaptureError::Tool {
                tool: "xdotool",
                status: output.status,
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let mut parts = text.split_whitespace();
        let width = parts.next().and_then(|value| value.parse().ok());
        let height = parts.next().and_then(|value| value.parse().ok());
        match (width, height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Ok(Resolution::new(width, height))
            }
            _ => Err(CaptureError::Geometry),
        }
    }
}

impl Default for ScrotCapturer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenCapturer for ScrotCapturer {
    async fn capture(&self, format: ImageFormat) -> Result<Frame, CaptureError> {
        let resolution = self.probe_resolution().await?;
        let path = self
            .scratch_dir
            .join(format!("ctrltk-{}.{}", Uuid::new_v4(), format.extension()));

        let status = Command::new("scrot")
            .arg("--overwrite")
            .arg(&path)
            .status()
            .await
            .map_err(|source| CaptureError::Spawn {
                tool: "scrot",
                source,
            })?;
        if !status.success() {
            return Err(CaptureError::Tool {
                tool: "scrot",
                status,
            });
        }

        let bytes = tokio::fs::read(&path).await.map_err(CaptureError::Artifact)?;
        if let Err(err) = tokio::fs::remove_file(&path).await {
            debug!(path = %path.display(), error = %err, "failed to remove capture artifact");
        }

        Ok(Frame { bytes, resolution })
    }
}
