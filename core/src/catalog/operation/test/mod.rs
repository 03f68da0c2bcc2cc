use camino::Utf8PathBuf as PathBuf;

use crate::{
    config::{Assets, BinPaths, Config, Storage},
    model::{Playlist, PlaylistId, Thumbnail, ThumbnailId, ThumbnailType, Video, VideoId},
};


pub fn test_config() -> Config {
    Config {
        storage: Storage {
            thumbnails_dir: PathBuf::from("/data/thumbnails"),
            previews_dir: PathBuf::from("/data/previews"),
        },
        assets: Assets {
            default_audio_background: PathBuf::from("/opt/assets/audio-background.jpg"),
        },
        bin_paths: BinPaths::default(),
    }
}

pub fn test_video(uuid: &str, remote: bool, thumbnails: Vec<Thumbnail>) -> Video {
    Video {
        id: VideoId(1),
        uuid: uuid.to_string(),
        remote,
        thumbnails,
    }
}

pub fn test_playlist(uuid: &str, remote: bool, thumbnails: Vec<Thumbnail>) -> Playlist {
    Playlist {
        id: PlaylistId(1),
        uuid: uuid.to_string(),
        remote,
        thumbnails,
    }
}

pub fn persisted_thumbnail(
    filename: &str,
    ty: ThumbnailType,
    file_url: Option<&str>,
) -> Thumbnail {
    Thumbnail {
        id: Some(ThumbnailId(7)),
        filename: filename.to_string(),
        width: 223,
        height: 122,
        ty,
        file_url: file_url.map(|url| url.to_string()),
        automatically_generated: None,
        previous_thumbnail_filename: None,
    }
}
