use std::process::Stdio;

use async_trait::async_trait;
use camino::Utf8Path as Path;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::model::Size;

#[derive(thiserror::Error, Debug)]
pub enum ImageProcessingError {
    #[error("failed to call ffmpeg")]
    ErrorStarting(#[source] std::io::Error),
    #[error("ffmpeg exited with non-zero code, input unreadable or unsupported")]
    ExitedWithError,
    #[error("ffmpeg exited by signal")]
    TerminatedBySignal,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resize an input image to exact target dimensions at `output_path`.
/// The input file is consumed (deleted) unless `keep_original` is set.
#[async_trait]
pub trait ProcessImageTrait {
    async fn process_image(
        input_path: &Path,
        output_path: &Path,
        size: Size,
        keep_original: bool,
        ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), ImageProcessingError>;
}

pub struct ProcessImage {}

#[async_trait]
impl ProcessImageTrait for ProcessImage {
    #[instrument(name = "process_image")]
    async fn process_image(
        input_path: &Path,
        output_path: &Path,
        size: Size,
        keep_original: bool,
        ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), ImageProcessingError> {
        let mut command = Command::new(ffmpeg_bin_path.unwrap_or(Path::new("ffmpeg")));
        command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .arg("-nostdin")
            .arg("-y")
            .arg("-i")
            .arg(input_path)
            .arg("-vf")
            .arg(format!("scale={}:{}", size.width, size.height))
            .args(["-frames:v", "1"])
            .arg(output_path);
        debug!(command = ?command.as_std(), "Invoking ffmpeg");
        let exit_status = command
            .spawn()
            .map_err(ImageProcessingError::ErrorStarting)?
            .wait()
            .await?;
        match exit_status.code() {
            Some(0) => {}
            Some(_) => return Err(ImageProcessingError::ExitedWithError),
            None => return Err(ImageProcessingError::TerminatedBySignal),
        }
        if !keep_original && input_path != output_path {
            tokio::fs::remove_file(input_path).await?;
        }
        Ok(())
    }
}

pub struct ProcessImageMock {}

#[cfg(feature = "mock-commands")]
#[async_trait]
impl ProcessImageTrait for ProcessImageMock {
    #[instrument(name = "process_image_mock")]
    async fn process_image(
        _input_path: &Path,
        _output_path: &Path,
        _size: Size,
        _keep_original: bool,
        _ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), ImageProcessingError> {
        Ok(())
    }
}
