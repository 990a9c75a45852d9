use crate::{
    id::{AlbumId, ArtistId},
    image::Image,
    resource::{MultipartBody, Payload, Resource, ResourceKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Album {
    pub id: AlbumId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "anio_lanzamiento")]
    pub release_year: i32,
    #[serde(rename = "artista")]
    pub artist: ArtistId,
    #[serde(rename = "portada", default)]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumFields {
    pub title: String,
    pub release_year: Option<i32>,
    pub artist: Option<ArtistId>,
    pub cover: Option<Image>,
}

impl AlbumFields {
    /// Blank draft for a new album by `artist`.
    pub fn for_artist(artist: Option<ArtistId>) -> Self {
        Self {
            artist,
            ..Default::default()
        }
    }
}

impl From<&Album> for AlbumFields {
    fn from(album: &Album) -> Self {
        Self {
            title: album.title.clone(),
            release_year: Some(album.release_year),
            artist: Some(album.artist),
            cover: album.cover.clone().map(Image::Remote),
        }
    }
}

/// `/api/albumes/`
#[derive(Debug, Clone, Copy, Default)]
pub struct Albums;

impl Resource for Albums {
    const KIND: ResourceKind = ResourceKind::Album;
    const PATH: &'static str = "albumes/";

    type Id = AlbumId;
    type Entity = Album;
    type Fields = AlbumFields;

    fn id(entity: &Album) -> AlbumId {
        entity.id
    }

    fn fields(entity: &Album) -> AlbumFields {
        entity.into()
    }

    fn encode(fields: &AlbumFields) -> Payload {
        Payload::Multipart(
            MultipartBody::default()
                .text("titulo", &fields.title)
                .text(
                    "anio_lanzamiento",
                    fields.release_year.map(|y| y.to_string()).unwrap_or_default(),
                )
                .text(
                    "artista",
                    fields.artist.map(|a| a.to_string()).unwrap_or_default(),
                )
                .file("portada", fields.cover.as_ref().and_then(Image::as_local)),
        )
    }
}
