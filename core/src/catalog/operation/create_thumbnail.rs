use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use tracing::instrument;

use crate::{
    config::{Config, PREVIEWS_SIZE, THUMBNAILS_SIZE},
    model::{
        Playlist, Size, Thumbnail, ThumbnailOwner, ThumbnailSize, ThumbnailType, Video, VideoFile,
    },
    processing::{
        commands::{DownloadImage, ExtractFrame, ProcessImage},
        image::{
            download::{DownloadImageTrait, FetchError},
            resize::{ImageProcessingError, ProcessImageTrait},
        },
        video::{ffmpeg_snapshot::ExtractFrameTrait, MediaProcessingError},
    },
};

#[derive(thiserror::Error, Debug)]
pub enum ThumbnailError {
    #[error("thumbnail type {ty} is not supported for {entity}")]
    Configuration {
        entity: &'static str,
        ty: ThumbnailType,
    },
    #[error(transparent)]
    Image(#[from] ImageProcessingError),
    #[error(transparent)]
    Media(#[from] MediaProcessingError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Generate a thumbnail from a local image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromExistingFile {
    pub input_path: PathBuf,
    pub automatically_generated: bool,
    /// Keep the input file instead of consuming it. Defaults to false.
    pub keep_original: bool,
    pub size: ThumbnailSize,
}

/// Generate a thumbnail by downloading it from a remote origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromUrl {
    pub download_url: String,
    pub size: ThumbnailSize,
}

/// Resolved naming and dimensions for one (entity, type) pair, plus the
/// record a regeneration would update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ThumbnailMetadata {
    pub filename: String,
    pub base_path: PathBuf,
    pub output_path: PathBuf,
    pub width: i32,
    pub height: i32,
    pub existing: Option<Thumbnail>,
}

pub(crate) fn build_metadata_from_video(
    config: &Config,
    video: &Video,
    ty: ThumbnailType,
    size: ThumbnailSize,
) -> ThumbnailMetadata {
    let filename = video.generate_thumbnail_filename(ty);
    let (base_path, default_size) = match ty {
        ThumbnailType::Miniature => (config.storage.thumbnails_dir.clone(), THUMBNAILS_SIZE),
        ThumbnailType::Preview => (config.storage.previews_dir.clone(), PREVIEWS_SIZE),
    };
    let Size { width, height } = match size {
        ThumbnailSize::Default => default_size,
        ThumbnailSize::Custom(size) => size,
    };
    ThumbnailMetadata {
        output_path: base_path.join(&filename),
        existing: video.existing_thumbnail(ty).cloned(),
        filename,
        base_path,
        width,
        height,
    }
}

pub(crate) fn build_metadata_from_playlist(
    config: &Config,
    playlist: &Playlist,
    ty: ThumbnailType,
    size: ThumbnailSize,
) -> Result<ThumbnailMetadata, ThumbnailError> {
    if ty != ThumbnailType::Miniature {
        return Err(ThumbnailError::Configuration {
            entity: "playlist",
            ty,
        });
    }
    let filename = playlist.generate_thumbnail_filename(ty);
    let base_path = config.storage.thumbnails_dir.clone();
    let Size { width, height } = match size {
        ThumbnailSize::Default => THUMBNAILS_SIZE,
        ThumbnailSize::Custom(size) => size,
    };
    Ok(ThumbnailMetadata {
        output_path: base_path.join(&filename),
        existing: playlist.existing_thumbnail(ty).cloned(),
        filename,
        base_path,
        width,
        height,
    })
}

/// Filename schemes remote thumbnail URLs have used over time.
/// `EntityUnique` names (URL ending in `{uuid}.jpg`) were introduced with
/// per-entity unique filenames; a URL still using one must always be
/// treated as changed so the artifact migrates to the current scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilenameScheme {
    Shared,
    EntityUnique,
}

pub(crate) fn url_filename_scheme(download_url: &str, entity_uuid: &str) -> FilenameScheme {
    if download_url.ends_with(&format!("{}.jpg", entity_uuid)) {
        FilenameScheme::EntityUnique
    } else {
        FilenameScheme::Shared
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DownloadAction {
    pub filename: String,
    pub needs_download: bool,
}

/// Decide whether a download is needed at all, and which filename the
/// record keeps. An unchanged URL on a `Shared`-scheme name means the
/// remote artifact did not change: keep the existing filename and skip
/// the fetch entirely.
pub(crate) fn resolve_download_action(
    existing: Option<&Thumbnail>,
    download_url: &str,
    entity_uuid: &str,
    updated_filename: String,
) -> DownloadAction {
    let up_to_date = existing.and_then(|thumbnail| {
        let existing_url = thumbnail.file_url.as_deref()?;
        let unchanged = existing_url == download_url
            && url_filename_scheme(download_url, entity_uuid) == FilenameScheme::Shared;
        unchanged.then(|| thumbnail.filename.clone())
    });
    match up_to_date {
        Some(filename) => DownloadAction {
            filename,
            needs_download: false,
        },
        None => DownloadAction {
            filename: updated_filename,
            needs_download: true,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ThumbnailSideEffect {
    ProcessImage {
        input_path: PathBuf,
        keep_original: bool,
    },
    DownloadImage {
        url: String,
    },
    ExtractFrame {
        media_path: PathBuf,
    },
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StageParams {
    pub filename: String,
    pub width: i32,
    pub height: i32,
    pub ty: ThumbnailType,
    pub file_url: Option<String>,
    pub automatically_generated: Option<bool>,
    pub existing: Option<Thumbnail>,
}

/// Resolve the record to mutate and apply the new field values to it.
/// When the update changes the filename, the old one is stashed in
/// `previous_thumbnail_filename` first so the caller can delete the
/// orphaned file after persisting.
pub(crate) fn stage_thumbnail(params: StageParams) -> Thumbnail {
    let old_filename = params
        .existing
        .as_ref()
        .filter(|existing| existing.filename != params.filename)
        .map(|existing| existing.filename.clone());
    let mut thumbnail = params
        .existing
        .unwrap_or_else(|| Thumbnail::new(params.ty));
    thumbnail.filename = params.filename;
    thumbnail.width = params.width;
    thumbnail.height = params.height;
    thumbnail.ty = params.ty;
    thumbnail.file_url = params.file_url;
    thumbnail.automatically_generated = params.automatically_generated;
    if let Some(old_filename) = old_filename {
        thumbnail.previous_thumbnail_filename = Some(old_filename);
    }
    thumbnail
}

/// Stage the record, then run the producing side effect. On failure the
/// error propagates and the staged record is dropped; the caller must
/// only persist the returned record.
async fn create_thumbnail_from(
    config: &Config,
    side_effect: ThumbnailSideEffect,
    base_path: &Path,
    params: StageParams,
) -> Result<Thumbnail, ThumbnailError> {
    let size = Size {
        width: params.width,
        height: params.height,
    };
    let filename = params.filename.clone();
    let output_path = base_path.join(&filename);
    let thumbnail = stage_thumbnail(params);
    let ffmpeg_bin_path = config.bin_paths.ffmpeg.as_deref();
    match side_effect {
        ThumbnailSideEffect::ProcessImage {
            input_path,
            keep_original,
        } => {
            ProcessImage::process_image(
                &input_path,
                &output_path,
                size,
                keep_original,
                ffmpeg_bin_path,
            )
            .await?
        }
        ThumbnailSideEffect::DownloadImage { url } => {
            DownloadImage::download_image(&url, base_path, &filename, size, ffmpeg_bin_path)
                .await?
        }
        ThumbnailSideEffect::ExtractFrame { media_path } => {
            ExtractFrame::extract_frame(&media_path, base_path, &filename, size, ffmpeg_bin_path)
                .await?
        }
        ThumbnailSideEffect::None => {}
    }
    Ok(thumbnail)
}

/// Generate a video miniature or preview by resizing a local image file.
#[instrument(skip(config, options), fields(video = %video.id))]
pub async fn create_video_thumbnail_from_existing(
    config: &Config,
    video: &Video,
    ty: ThumbnailType,
    options: FromExistingFile,
) -> Result<Thumbnail, ThumbnailError> {
    let metadata = build_metadata_from_video(config, video, ty, options.size);
    create_thumbnail_from(
        config,
        ThumbnailSideEffect::ProcessImage {
            input_path: options.input_path,
            keep_original: options.keep_original,
        },
        &metadata.base_path,
        StageParams {
            filename: metadata.filename,
            width: metadata.width,
            height: metadata.height,
            ty,
            file_url: None,
            automatically_generated: Some(options.automatically_generated),
            existing: metadata.existing,
        },
    )
    .await
}

/// Generate a video miniature or preview by downloading it. If the URL on
/// the existing record is unchanged the fetch is skipped and the record
/// returned as is.
#[instrument(skip(config, options), fields(video = %video.id))]
pub async fn create_video_thumbnail_from_url(
    config: &Config,
    video: &Video,
    ty: ThumbnailType,
    options: FromUrl,
) -> Result<Thumbnail, ThumbnailError> {
    let metadata = build_metadata_from_video(config, video, ty, options.size);
    // Only record the remote URL for videos mirrored from another instance
    let file_url = if video.is_owned() {
        None
    } else {
        Some(options.download_url.clone())
    };
    let action = resolve_download_action(
        metadata.existing.as_ref(),
        &options.download_url,
        &video.uuid,
        metadata.filename,
    );
    let side_effect = if action.needs_download {
        ThumbnailSideEffect::DownloadImage {
            url: options.download_url,
        }
    } else {
        ThumbnailSideEffect::None
    };
    create_thumbnail_from(
        config,
        side_effect,
        &metadata.base_path,
        StageParams {
            filename: action.filename,
            width: metadata.width,
            height: metadata.height,
            ty,
            file_url,
            automatically_generated: None,
            existing: metadata.existing,
        },
    )
    .await
}

pub(crate) fn frame_side_effect(config: &Config, video_file: &VideoFile) -> ThumbnailSideEffect {
    if video_file.is_audio() {
        // No visual track to extract from, fall back to the stock background
        ThumbnailSideEffect::ProcessImage {
            input_path: config.assets.default_audio_background.clone(),
            keep_original: true,
        }
    } else {
        ThumbnailSideEffect::ExtractFrame {
            media_path: video_file.path.clone(),
        }
    }
}

/// Generate a thumbnail from the video's own media, extracting a frame or
/// substituting the default audio background for audio-only files.
#[instrument(skip(config, video_file), fields(video = %video.id))]
pub async fn generate_video_thumbnail(
    config: &Config,
    video: &Video,
    video_file: &VideoFile,
    ty: ThumbnailType,
) -> Result<Thumbnail, ThumbnailError> {
    let metadata = build_metadata_from_video(config, video, ty, ThumbnailSize::Default);
    create_thumbnail_from(
        config,
        frame_side_effect(config, video_file),
        &metadata.base_path,
        StageParams {
            filename: metadata.filename,
            width: metadata.width,
            height: metadata.height,
            ty,
            file_url: None,
            automatically_generated: Some(true),
            existing: metadata.existing,
        },
    )
    .await
}

/// Build or update the metadata record only, without producing any bytes.
/// Used when materialization is deferred, typically for lazily mirrored
/// remote thumbnails.
#[instrument(skip(config), fields(video = %video.id))]
pub fn create_placeholder_thumbnail(
    config: &Config,
    video: &Video,
    ty: ThumbnailType,
    file_url: String,
    size: ThumbnailSize,
) -> Thumbnail {
    let metadata = build_metadata_from_video(config, video, ty, size);
    let mut thumbnail = metadata
        .existing
        .unwrap_or_else(|| Thumbnail::new(ty));
    thumbnail.filename = metadata.filename;
    thumbnail.width = metadata.width;
    thumbnail.height = metadata.height;
    thumbnail.ty = ty;
    thumbnail.file_url = Some(file_url);
    thumbnail
}

/// Generate a playlist miniature by resizing a local image file.
/// Playlists only support miniatures.
#[instrument(skip(config, options), fields(playlist = %playlist.id))]
pub async fn create_playlist_miniature_from_existing(
    config: &Config,
    playlist: &Playlist,
    ty: ThumbnailType,
    options: FromExistingFile,
) -> Result<Thumbnail, ThumbnailError> {
    let metadata = build_metadata_from_playlist(config, playlist, ty, options.size)?;
    create_thumbnail_from(
        config,
        ThumbnailSideEffect::ProcessImage {
            input_path: options.input_path,
            keep_original: options.keep_original,
        },
        &metadata.base_path,
        StageParams {
            filename: metadata.filename,
            width: metadata.width,
            height: metadata.height,
            ty,
            file_url: None,
            automatically_generated: Some(options.automatically_generated),
            existing: metadata.existing,
        },
    )
    .await
}

/// Generate a playlist miniature by downloading it.
/// Playlists only support miniatures.
#[instrument(skip(config, options), fields(playlist = %playlist.id))]
pub async fn create_playlist_miniature_from_url(
    config: &Config,
    playlist: &Playlist,
    ty: ThumbnailType,
    options: FromUrl,
) -> Result<Thumbnail, ThumbnailError> {
    let metadata = build_metadata_from_playlist(config, playlist, ty, options.size)?;
    let file_url = if playlist.is_owned() {
        None
    } else {
        Some(options.download_url.clone())
    };
    create_thumbnail_from(
        config,
        ThumbnailSideEffect::DownloadImage {
            url: options.download_url,
        },
        &metadata.base_path,
        StageParams {
            filename: metadata.filename,
            width: metadata.width,
            height: metadata.height,
            ty,
            file_url,
            automatically_generated: None,
            existing: metadata.existing,
        },
    )
    .await
}

/// Delete the file a renaming update superseded and clear the stash.
/// Call only after the updated record has been persisted.
#[instrument(skip(config))]
pub async fn remove_superseded_file(
    config: &Config,
    thumbnail: &mut Thumbnail,
) -> std::io::Result<()> {
    if let Some(old_filename) = thumbnail.take_previous_filename() {
        let base_path = match thumbnail.ty {
            ThumbnailType::Miniature => &config.storage.thumbnails_dir,
            ThumbnailType::Preview => &config.storage.previews_dir,
        };
        tokio::fs::remove_file(base_path.join(old_filename)).await?;
    }
    Ok(())
}
