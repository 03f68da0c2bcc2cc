use super::{PlaylistId, Thumbnail, ThumbnailOwner, ThumbnailType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub uuid: String,
    pub remote: bool,
    pub thumbnails: Vec<Thumbnail>,
}

impl ThumbnailOwner for Playlist {
    /// Playlists only ever have miniatures, so the type does not vary
    /// the name.
    fn generate_thumbnail_filename(&self, _ty: ThumbnailType) -> String {
        format!("{}-miniature.jpg", self.uuid)
    }

    fn is_owned(&self) -> bool {
        !self.remote
    }

    fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }
}
