use std::process::Stdio;

use async_trait::async_trait;
use camino::Utf8Path as Path;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::MediaProcessingError;
use crate::model::Size;

/// Extract a representative frame from a video file and write it as an
/// image of the given dimensions to `out_dir/filename`.
#[async_trait]
pub trait ExtractFrameTrait {
    async fn extract_frame(
        media_path: &Path,
        out_dir: &Path,
        filename: &str,
        size: Size,
        ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), MediaProcessingError>;
}

pub struct ExtractFrame {}

#[async_trait]
impl ExtractFrameTrait for ExtractFrame {
    #[instrument(name = "extract_frame")]
    async fn extract_frame(
        media_path: &Path,
        out_dir: &Path,
        filename: &str,
        size: Size,
        ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), MediaProcessingError> {
        let mut command = Command::new(ffmpeg_bin_path.unwrap_or(Path::new("ffmpeg")));
        command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .arg("-nostdin")
            .arg("-y")
            .arg("-i")
            .arg(media_path)
            .args(["-ss", "00:00:00.00", "-frames:v", "1"])
            .arg("-vf")
            .arg(format!("scale={}:{}", size.width, size.height))
            .arg(out_dir.join(filename));
        debug!(command = ?command.as_std(), "Invoking ffmpeg");
        let exit_status = command
            .spawn()
            .map_err(|source| MediaProcessingError::ErrorStarting {
                bin: "ffmpeg",
                source,
            })?
            .wait()
            .await?;
        match exit_status.code() {
            Some(0) => Ok(()),
            Some(_) => Err(MediaProcessingError::ExitedWithError { bin: "ffmpeg" }),
            None => Err(MediaProcessingError::TerminatedBySignal { bin: "ffmpeg" }),
        }
    }
}

pub struct ExtractFrameMock {}

#[cfg(feature = "mock-commands")]
#[async_trait]
impl ExtractFrameTrait for ExtractFrameMock {
    #[instrument(name = "extract_frame_mock")]
    async fn extract_frame(
        _media_path: &Path,
        _out_dir: &Path,
        _filename: &str,
        _size: Size,
        _ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), MediaProcessingError> {
        Ok(())
    }
}
