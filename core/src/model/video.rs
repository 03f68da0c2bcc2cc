use camino::Utf8PathBuf as PathBuf;

use super::{Thumbnail, ThumbnailOwner, ThumbnailType, VideoId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: VideoId,
    pub uuid: String,
    /// True for entities mirrored from another instance.
    pub remote: bool,
    pub thumbnails: Vec<Thumbnail>,
}

impl ThumbnailOwner for Video {
    fn generate_thumbnail_filename(&self, ty: ThumbnailType) -> String {
        match ty {
            ThumbnailType::Miniature => format!("{}-miniature.jpg", self.uuid),
            ThumbnailType::Preview => format!("{}-preview.jpg", self.uuid),
        }
    }

    fn is_owned(&self) -> bool {
        !self.remote
    }

    fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }
}

/// One playable file of a video. `resolution` is the vertical resolution,
/// 0 for audio-only files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub path: PathBuf,
    pub resolution: i32,
}

impl VideoFile {
    pub fn is_audio(&self) -> bool {
        self.resolution == 0
    }
}
