use std::{fmt, future::Future};

use catalog::{
    CatalogError,
    album::{Album, AlbumFields, Albums},
    artist::{Artist, Artists},
    id::{AlbumId, ArtistId},
    resource::{Collection, Resource},
    song::{Song, SongFields, Songs},
};

use crate::{backend::Backend, panel::fields::Editable};

/// How a resource is fetched, filtered and pre-filled by its panel.
pub trait Listing: Resource<Fields: Editable> + Sized {
    type Filter: Clone + Default + PartialEq + fmt::Debug + Send + Sync;
    /// Other collection fetched alongside this one (names for lookups, filter resolution).
    type Related: Clone + Default + fmt::Debug + Send + Sync;

    fn collection<B: Backend>(backend: &B) -> impl Collection<Self>;

    fn related<B: Backend>(
        backend: &B,
    ) -> impl Future<Output = Result<Self::Related, CatalogError>> + Send;

    fn visible(item: &Self::Entity, filter: &Self::Filter, related: &Self::Related) -> bool;

    /// Blank draft for a new entity under `filter`.
    fn prefill(filter: &Self::Filter) -> Self::Fields;
}

impl Listing for Artists {
    type Filter = ();
    type Related = ();

    fn collection<B: Backend>(backend: &B) -> impl Collection<Self> {
        backend.artists()
    }

    fn related<B: Backend>(_: &B) -> impl Future<Output = Result<(), CatalogError>> + Send {
        std::future::ready(Ok(()))
    }

    fn visible(_: &Artist, _: &(), _: &()) -> bool {
        true
    }

    fn prefill(_: &()) -> Self::Fields {
        Default::default()
    }
}

impl Listing for Albums {
    type Filter = Option<ArtistId>;
    type Related = Vec<Artist>;

    fn collection<B: Backend>(backend: &B) -> impl Collection<Self> {
        backend.albums()
    }

    fn related<B: Backend>(
        backend: &B,
    ) -> impl Future<Output = Result<Vec<Artist>, CatalogError>> + Send {
        let artists = backend.artists();
        async move { artists.list().await }
    }

    fn visible(album: &Album, filter: &Option<ArtistId>, _: &Vec<Artist>) -> bool {
        filter.is_none_or(|artist| album.artist == artist)
    }

    fn prefill(filter: &Option<ArtistId>) -> AlbumFields {
        AlbumFields::for_artist(*filter)
    }
}

/// Song scope: an album filter wins over an artist filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub artist: Option<ArtistId>,
    pub album: Option<AlbumId>,
}

impl SongFilter {
    pub fn artist(artist: ArtistId) -> Self {
        Self {
            artist: Some(artist),
            album: None,
        }
    }
}

impl Listing for Songs {
    type Filter = SongFilter;
    type Related = Vec<Album>;

    fn collection<B: Backend>(backend: &B) -> impl Collection<Self> {
        backend.songs()
    }

    fn related<B: Backend>(
        backend: &B,
    ) -> impl Future<Output = Result<Vec<Album>, CatalogError>> + Send {
        let albums = backend.albums();
        async move { albums.list().await }
    }

    fn visible(song: &Song, filter: &SongFilter, albums: &Vec<Album>) -> bool {
        match (filter.album, filter.artist) {
            (Some(album), _) => song.album == album,
            (None, Some(artist)) => albums
                .iter()
                .any(|a| a.id == song.album && a.artist == artist),
            (None, None) => true,
        }
    }

    fn prefill(filter: &SongFilter) -> SongFields {
        SongFields::for_album(filter.album)
    }
}

/// Albums a song form may pick from under `filter`.
pub fn album_choices<'a>(albums: &'a [Album], filter: &SongFilter) -> Vec<&'a Album> {
    albums
        .iter()
        .filter(|a| filter.artist.is_none_or(|artist| a.artist == artist))
        .collect()
}
