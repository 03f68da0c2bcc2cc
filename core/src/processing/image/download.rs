use async_trait::async_trait;
use camino::Utf8Path as Path;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use super::resize::{ImageProcessingError, ProcessImage, ProcessImageTrait};
use crate::model::Size;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("error requesting image")]
    Request(#[from] reqwest::Error),
    #[error("image request failed with status {status}")]
    BadStatus { status: reqwest::StatusCode },
    #[error("downloaded payload is not a processable image")]
    InvalidImage(#[source] ImageProcessingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fetch a remote image and materialize it at `out_dir/filename`,
/// resized to `size`.
#[async_trait]
pub trait DownloadImageTrait {
    async fn download_image(
        url: &str,
        out_dir: &Path,
        filename: &str,
        size: Size,
        ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), FetchError>;
}

pub struct DownloadImage {}

#[async_trait]
impl DownloadImageTrait for DownloadImage {
    #[instrument(name = "download_image", skip(ffmpeg_bin_path))]
    async fn download_image(
        url: &str,
        out_dir: &Path,
        filename: &str,
        size: Size,
        ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), FetchError> {
        let response = reqwest::get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus { status });
        }
        // Stage the raw payload in a temp file, then resize into place.
        let staging_path = tempfile::Builder::new()
            .prefix("dl")
            .tempfile()?
            .into_temp_path();
        let utf8_staging_path: camino::Utf8PathBuf = staging_path
            .to_path_buf()
            .try_into()
            .expect("tempfile paths should be UTF8");
        let staging_file = tokio::fs::File::options()
            .write(true)
            .open(&utf8_staging_path)
            .await?;
        let mut out_buf = tokio::io::BufWriter::new(staging_file);
        let mut dl_stream = response.bytes_stream();
        while let Some(bytes) = dl_stream.next().await {
            tokio::io::copy(&mut bytes?.as_ref(), &mut out_buf).await?;
        }
        out_buf.flush().await?;
        // The temp path is cleaned up on drop, so the resize must not
        // consume its input.
        ProcessImage::process_image(
            &utf8_staging_path,
            &out_dir.join(filename),
            size,
            true,
            ffmpeg_bin_path,
        )
        .await
        .map_err(FetchError::InvalidImage)?;
        Ok(())
    }
}

pub struct DownloadImageMock {}

#[cfg(feature = "mock-commands")]
#[async_trait]
impl DownloadImageTrait for DownloadImageMock {
    #[instrument(name = "download_image_mock")]
    async fn download_image(
        _url: &str,
        _out_dir: &Path,
        _filename: &str,
        _size: Size,
        _ffmpeg_bin_path: Option<&Path>,
    ) -> Result<(), FetchError> {
        Ok(())
    }
}
