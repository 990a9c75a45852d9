use crate::{
    id::{AlbumId, SongId},
    resource::{Payload, Resource, ResourceKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Song {
    pub id: SongId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "duracion", default)]
    pub duration: String,
    pub album: AlbumId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFields {
    pub title: String,
    pub duration: String,
    pub album: Option<AlbumId>,
}

impl SongFields {
    pub fn for_album(album: Option<AlbumId>) -> Self {
        Self {
            album,
            ..Default::default()
        }
    }
}

impl From<&Song> for SongFields {
    fn from(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            duration: song.duration.clone(),
            album: Some(song.album),
        }
    }
}

/// `/api/canciones/`
#[derive(Debug, Clone, Copy, Default)]
pub struct Songs;

impl Resource for Songs {
    const KIND: ResourceKind = ResourceKind::Song;
    const PATH: &'static str = "canciones/";

    type Id = SongId;
    type Entity = Song;
    type Fields = SongFields;

    fn id(entity: &Song) -> SongId {
        entity.id
    }

    fn fields(entity: &Song) -> SongFields {
        entity.into()
    }

    fn encode(fields: &SongFields) -> Payload {
        Payload::Json(serde_json::json!({
            "titulo": fields.title,
            "duracion": fields.duration,
            "album": fields.album,
        }))
    }
}
