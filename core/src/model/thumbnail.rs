use camino::Utf8PathBuf as PathBuf;

use super::ThumbnailId;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ThumbnailType {
    /// Small image representing the entity in listings.
    Miniature,
    /// Large image shown on a video's detail page. Videos only.
    Preview,
}

/// Requested dimensions for a generation. `Default` resolves to the
/// type-appropriate size from config, never silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailSize {
    #[default]
    Default,
    Custom(Size),
}

/// Persisted record describing one derived image artifact.
/// At most one exists per (owning entity, type); regenerations mutate it
/// in place instead of creating a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// None until the caller has persisted the record.
    pub id: Option<ThumbnailId>,
    pub filename: String,
    /// Dimensions of the image actually written, not the requested target.
    pub width: i32,
    pub height: i32,
    pub ty: ThumbnailType,
    /// Set iff the authoritative bytes live at a remote origin
    /// (federated entity). Always None for owned entities.
    pub file_url: Option<String>,
    pub automatically_generated: Option<bool>,
    /// Filename this record superseded during a renaming update.
    /// The caller deletes that file after a successful persist,
    /// then clears this field.
    pub previous_thumbnail_filename: Option<String>,
}

impl Thumbnail {
    /// Empty record of the given type, to be filled in by a generation.
    pub fn new(ty: ThumbnailType) -> Thumbnail {
        Thumbnail {
            id: None,
            filename: String::new(),
            width: 0,
            height: 0,
            ty,
            file_url: None,
            automatically_generated: None,
            previous_thumbnail_filename: None,
        }
    }

    pub fn path(&self, config: &Config) -> PathBuf {
        let base_path = match self.ty {
            ThumbnailType::Miniature => &config.storage.thumbnails_dir,
            ThumbnailType::Preview => &config.storage.previews_dir,
        };
        base_path.join(&self.filename)
    }

    pub fn take_previous_filename(&mut self) -> Option<String> {
        self.previous_thumbnail_filename.take()
    }
}

/// Capability of entities that can carry thumbnail records.
pub trait ThumbnailOwner {
    /// Canonical filename for an artifact of the given type, derived from
    /// the entity's stable identifier. Deterministic across regenerations.
    fn generate_thumbnail_filename(&self, ty: ThumbnailType) -> String;

    /// Whether the entity is authored on this instance, as opposed to
    /// mirrored from a remote one.
    fn is_owned(&self) -> bool;

    fn thumbnails(&self) -> &[Thumbnail];

    fn existing_thumbnail(&self, ty: ThumbnailType) -> Option<&Thumbnail> {
        self.thumbnails().iter().find(|t| t.ty == ty)
    }
}
