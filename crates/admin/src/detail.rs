//! `/artist/{id}`: one artist with their albums and songs.

use catalog::{
    album::Album,
    artist::Artist,
    id::{AlbumId, ArtistId},
    resource::{Collection, ResourceKind},
};
use tokio::sync::broadcast;

use crate::{
    access::Access,
    backend::Backend,
    bus::{self, Change, ChangeBus, ChangeOp},
    panel::{AlbumPanel, Outcome, Panel, SongFilter, SongPanel},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ArtistState {
    Loading,
    Found(Artist),
    NotFound,
}

pub struct ArtistDetail<B> {
    backend: B,
    artist_id: ArtistId,
    artist: ArtistState,
    albums: AlbumPanel<B>,
    songs: SongPanel<B>,
    selected_album: Option<Album>,
    albums_revision: u64,
    changes: broadcast::Receiver<Change>,
}

impl<B: Backend> ArtistDetail<B> {
    pub fn new(backend: B, bus: &ChangeBus, access: Access, artist_id: ArtistId) -> Self {
        let albums = Panel::new(backend.clone())
            .with_bus(bus.clone())
            .with_access(access)
            .with_filter(Some(artist_id));
        let songs = Panel::new(backend.clone())
            .with_bus(bus.clone())
            .with_access(access)
            .with_filter(SongFilter::artist(artist_id));

        Self {
            backend,
            artist_id,
            artist: ArtistState::Loading,
            albums,
            songs,
            selected_album: None,
            albums_revision: 0,
            changes: bus.subscribe(),
        }
    }

    pub fn artist_id(&self) -> ArtistId {
        self.artist_id
    }

    pub fn artist(&self) -> &ArtistState {
        &self.artist
    }

    pub fn albums(&self) -> &AlbumPanel<B> {
        &self.albums
    }

    pub fn albums_mut(&mut self) -> &mut AlbumPanel<B> {
        &mut self.albums
    }

    pub fn songs(&self) -> &SongPanel<B> {
        &self.songs
    }

    pub fn songs_mut(&mut self) -> &mut SongPanel<B> {
        &mut self.songs
    }

    pub fn selected_album(&self) -> Option<&Album> {
        self.selected_album.as_ref()
    }

    pub fn albums_revision(&self) -> u64 {
        self.albums_revision
    }

    pub async fn activate(&mut self) {
        self.resolve().await;
        self.sync().await;
    }

    /// Scans the whole artist list, there is no single-item endpoint.
    async fn resolve(&mut self) {
        self.artist = match self.backend.artists().list().await {
            Ok(artists) => match artists.into_iter().find(|a| a.id == self.artist_id) {
                Some(artist) => ArtistState::Found(artist),
                None => {
                    tracing::info!(artist = %self.artist_id, "artist not found");
                    ArtistState::NotFound
                }
            },
            Err(e) => {
                tracing::warn!(artist = %self.artist_id, error = %e, "failed to load artist");
                ArtistState::NotFound
            }
        };
    }

    pub fn set_access(&mut self, access: Access) {
        self.albums.set_access(access);
        self.songs.set_access(access);
    }

    /// Narrows the songs to one of this artist's albums.
    pub fn select_album(&mut self, id: AlbumId) -> Outcome {
        let Some(album) = self
            .albums
            .displayed()
            .into_iter()
            .find(|a| a.id == id)
            .cloned()
        else {
            return Outcome::Missing;
        };

        self.songs.set_filter(SongFilter {
            artist: Some(self.artist_id),
            album: Some(album.id),
        });
        self.selected_album = Some(album);
        Outcome::Done
    }

    pub fn clear_album_filter(&mut self) {
        self.selected_album = None;
        self.songs.set_filter(SongFilter::artist(self.artist_id));
    }

    fn observe(&mut self, change: Change) -> bool {
        match change.kind {
            ResourceKind::Album => {
                self.albums_revision += 1;
                let selected = self.selected_album.as_ref().map(|a| a.id.get());
                if change.op == ChangeOp::Deleted && change.id.is_some() && change.id == selected {
                    tracing::debug!(album = ?change.id, "selected album deleted");
                    self.clear_album_filter();
                }
                false
            }
            ResourceKind::Artist => change.id == Some(self.artist_id.get()),
            ResourceKind::Song => false,
        }
    }

    /// Applies queued changes, then re-fetches whatever went stale.
    pub async fn sync(&mut self) {
        let mut artist_changed = false;
        for change in bus::drain(&mut self.changes) {
            artist_changed |= self.observe(change);
        }

        if artist_changed {
            self.resolve().await;
        }

        self.songs.set_external(self.albums_revision);
        self.albums.sync().await;
        self.songs.sync().await;

        // keep the selection in step with the album list after an edit
        if let Some(selected) = &self.selected_album
            && let Some(album) = self.albums.find(selected.id)
        {
            self.selected_album = Some(album.clone());
        }
    }
}
