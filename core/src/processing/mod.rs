pub mod image;
pub mod video;

#[cfg(not(feature = "mock-commands"))]
pub mod commands {
    pub use super::image::download::DownloadImage;
    pub use super::image::resize::ProcessImage;
    pub use super::video::ffmpeg_snapshot::ExtractFrame;
}

#[cfg(feature = "mock-commands")]
pub mod commands {
    pub use super::image::download::DownloadImageMock as DownloadImage;
    pub use super::image::resize::ProcessImageMock as ProcessImage;
    pub use super::video::ffmpeg_snapshot::ExtractFrameMock as ExtractFrame;
}
