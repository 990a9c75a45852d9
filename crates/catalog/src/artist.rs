use crate::{
    id::ArtistId,
    image::Image,
    resource::{MultipartBody, Payload, Resource, ResourceKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Artist {
    pub id: ArtistId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "genero", default)]
    pub genre: String,
    #[serde(rename = "pais", default)]
    pub country: String,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistFields {
    pub name: String,
    pub genre: String,
    pub country: String,
    pub image: Option<Image>,
}

impl From<&Artist> for ArtistFields {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            genre: artist.genre.clone(),
            country: artist.country.clone(),
            image: artist.image.clone().map(Image::Remote),
        }
    }
}

/// `/api/artistas/`
#[derive(Debug, Clone, Copy, Default)]
pub struct Artists;

impl Resource for Artists {
    const KIND: ResourceKind = ResourceKind::Artist;
    const PATH: &'static str = "artistas/";

    type Id = ArtistId;
    type Entity = Artist;
    type Fields = ArtistFields;

    fn id(entity: &Artist) -> ArtistId {
        entity.id
    }

    fn fields(entity: &Artist) -> ArtistFields {
        entity.into()
    }

    fn encode(fields: &ArtistFields) -> Payload {
        Payload::Multipart(
            MultipartBody::default()
                .text("nombre", &fields.name)
                .text("genero", &fields.genre)
                .text("pais", &fields.country)
                .file("imagen", fields.image.as_ref().and_then(Image::as_local)),
        )
    }
}
