//! In-memory [`Backend`] for view tests.

use std::{
    collections::HashMap,
    future::Future,
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
};

use catalog::{
    CatalogError, StatusCode,
    album::{Album, AlbumFields, Albums},
    artist::{Artist, ArtistFields, Artists},
    image::Image,
    resource::{Collection, Resource, ResourceKind},
    song::{Song, SongFields, Songs},
};

use crate::backend::Backend;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Default)]
pub struct FakeDb {
    next_id: u64,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub songs: Vec<Song>,
    pub session: bool,
    pub uploads: Vec<(ResourceKind, String)>,
    pub list_calls: HashMap<ResourceKind, usize>,
    pub fail_lists: bool,
    pub fail_saves: bool,
}

impl FakeDb {
    fn id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    db: Arc<Mutex<FakeDb>>,
}

impl FakeBackend {
    pub fn signed_in() -> Self {
        let backend = Self::default();
        backend.db().session = true;
        backend
    }

    pub fn db(&self) -> MutexGuard<'_, FakeDb> {
        self.db.lock().unwrap()
    }

    pub fn list_calls(&self, kind: ResourceKind) -> usize {
        self.db().list_calls.get(&kind).copied().unwrap_or(0)
    }

    pub fn add_artist(&self, name: &str) -> Artist {
        let mut db = self.db();
        let artist = Artist {
            id: db.id().into(),
            name: name.into(),
            genre: String::new(),
            country: String::new(),
            image: None,
        };
        db.artists.push(artist.clone());
        artist
    }

    pub fn add_album(&self, title: &str, artist: &Artist) -> Album {
        let mut db = self.db();
        let album = Album {
            id: db.id().into(),
            title: title.into(),
            release_year: 2000,
            artist: artist.id,
            cover: None,
        };
        db.albums.push(album.clone());
        album
    }

    pub fn add_song(&self, title: &str, album: &Album) -> Song {
        let mut db = self.db();
        let song = Song {
            id: db.id().into(),
            title: title.into(),
            duration: "3:00".into(),
            album: album.id,
        };
        db.songs.push(song.clone());
        song
    }
}

fn rejected(body: &str) -> CatalogError {
    CatalogError::Validation {
        status: StatusCode::BAD_REQUEST,
        body: body.into(),
    }
}

fn unauthorized() -> CatalogError {
    CatalogError::Status {
        status: StatusCode::UNAUTHORIZED,
        body: "credentials were not provided".into(),
    }
}

fn stored(kind: ResourceKind, image: Option<&Image>, db: &mut FakeDb) -> Option<String> {
    match image? {
        Image::Remote(url) => Some(url.clone()),
        Image::Local(local) => {
            db.uploads.push((kind, local.file_name.clone()));
            Some(format!("http://media.test/{}", local.file_name))
        }
    }
}

/// Server-side behaviour of one collection.
pub trait Stored: Resource {
    fn table(db: &mut FakeDb) -> &mut Vec<Self::Entity>;
    fn build(
        db: &mut FakeDb,
        id: u64,
        fields: &Self::Fields,
        previous: Option<&Self::Entity>,
    ) -> Result<Self::Entity, CatalogError>;
}

impl Stored for Artists {
    fn table(db: &mut FakeDb) -> &mut Vec<Artist> {
        &mut db.artists
    }

    fn build(
        db: &mut FakeDb,
        id: u64,
        fields: &ArtistFields,
        previous: Option<&Artist>,
    ) -> Result<Artist, CatalogError> {
        if fields.name.is_empty() {
            return Err(rejected("nombre is required"));
        }
        let image = stored(Self::KIND, fields.image.as_ref(), db)
            .or_else(|| previous.and_then(|p| p.image.clone()));
        Ok(Artist {
            id: id.into(),
            name: fields.name.clone(),
            genre: fields.genre.clone(),
            country: fields.country.clone(),
            image,
        })
    }
}

impl Stored for Albums {
    fn table(db: &mut FakeDb) -> &mut Vec<Album> {
        &mut db.albums
    }

    fn build(
        db: &mut FakeDb,
        id: u64,
        fields: &AlbumFields,
        previous: Option<&Album>,
    ) -> Result<Album, CatalogError> {
        let (Some(release_year), Some(artist)) = (fields.release_year, fields.artist) else {
            return Err(rejected("anio_lanzamiento and artista are required"));
        };
        if fields.title.is_empty() || !db.artists.iter().any(|a| a.id == artist) {
            return Err(rejected("invalid album"));
        }
        let cover = stored(Self::KIND, fields.cover.as_ref(), db)
            .or_else(|| previous.and_then(|p| p.cover.clone()));
        Ok(Album {
            id: id.into(),
            title: fields.title.clone(),
            release_year,
            artist,
            cover,
        })
    }
}

impl Stored for Songs {
    fn table(db: &mut FakeDb) -> &mut Vec<Song> {
        &mut db.songs
    }

    fn build(
        db: &mut FakeDb,
        id: u64,
        fields: &SongFields,
        _: Option<&Song>,
    ) -> Result<Song, CatalogError> {
        let Some(album) = fields.album else {
            return Err(rejected("album is required"));
        };
        if fields.title.is_empty() || !db.albums.iter().any(|a| a.id == album) {
            return Err(rejected("invalid song"));
        }
        Ok(Song {
            id: id.into(),
            title: fields.title.clone(),
            duration: fields.duration.clone(),
            album,
        })
    }
}

pub struct FakeCollection<R> {
    db: Arc<Mutex<FakeDb>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Stored> FakeCollection<R> {
    fn db(&self) -> MutexGuard<'_, FakeDb> {
        self.db.lock().unwrap()
    }

    fn save(&self, id: Option<R::Id>, fields: &R::Fields) -> Result<R::Entity, CatalogError> {
        let mut db = self.db();
        if !db.session {
            return Err(unauthorized());
        }
        if db.fail_saves {
            return Err(rejected("server said no"));
        }

        match id {
            None => {
                let id = db.id();
                let entity = R::build(&mut db, id, fields, None)?;
                R::table(&mut db).push(entity.clone());
                Ok(entity)
            }
            Some(id) => {
                let Some(index) = R::table(&mut db).iter().position(|e| R::id(e) == id) else {
                    return Err(CatalogError::Status {
                        status: StatusCode::NOT_FOUND,
                        body: "not found".into(),
                    });
                };
                let previous = R::table(&mut db)[index].clone();
                let entity = R::build(&mut db, id.into(), fields, Some(&previous))?;
                R::table(&mut db)[index] = entity.clone();
                Ok(entity)
            }
        }
    }
}

impl<R: Stored> Collection<R> for FakeCollection<R> {
    fn list(&self) -> impl Future<Output = Result<Vec<R::Entity>, CatalogError>> + Send {
        let mut db = self.db();
        *db.list_calls.entry(R::KIND).or_default() += 1;
        let result = if db.fail_lists {
            Err(CatalogError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            })
        } else {
            Ok(R::table(&mut db).clone())
        };
        std::future::ready(result)
    }

    fn create(
        &self,
        fields: &R::Fields,
    ) -> impl Future<Output = Result<R::Entity, CatalogError>> + Send {
        std::future::ready(self.save(None, fields))
    }

    fn update(
        &self,
        id: R::Id,
        fields: &R::Fields,
    ) -> impl Future<Output = Result<R::Entity, CatalogError>> + Send {
        std::future::ready(self.save(Some(id), fields))
    }

    fn delete(&self, id: R::Id) -> impl Future<Output = Result<(), CatalogError>> + Send {
        let mut db = self.db();
        let result = if !db.session {
            Err(unauthorized())
        } else {
            let table = R::table(&mut db);
            match table.iter().position(|e| R::id(e) == id) {
                Some(index) => {
                    table.remove(index);
                    Ok(())
                }
                None => Err(CatalogError::Status {
                    status: StatusCode::NOT_FOUND,
                    body: "not found".into(),
                }),
            }
        };
        std::future::ready(result)
    }
}

impl FakeBackend {
    fn collection<R>(&self) -> FakeCollection<R> {
        FakeCollection {
            db: self.db.clone(),
            _resource: PhantomData,
        }
    }
}

impl Backend for FakeBackend {
    type Artists = FakeCollection<Artists>;
    type Albums = FakeCollection<Albums>;
    type Songs = FakeCollection<Songs>;

    fn artists(&self) -> Self::Artists {
        self.collection()
    }

    fn albums(&self) -> Self::Albums {
        self.collection()
    }

    fn songs(&self) -> Self::Songs {
        self.collection()
    }

    fn has_session(&self) -> bool {
        self.db().session
    }

    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send {
        let ok = username == USERNAME && password == PASSWORD;
        if ok {
            self.db().session = true;
        }
        std::future::ready(if ok {
            Ok(())
        } else {
            Err(CatalogError::Auth("invalid_grant".into()))
        })
    }

    fn logout(&self) -> Result<(), CatalogError> {
        self.db().session = false;
        Ok(())
    }
}
