//! In-process stand-in for the catalog REST API.
//!
//! Mirrors the contract the client relies on: multipart artists/albums, json songs,
//! bearer-protected mutations and a password-grant token endpoint.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use catalog::{Catalog, auth::ClientCredentials, session::Session};
use serde_json::{Value, json};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const ACCESS_TOKEN: &str = "tok-access";
pub const REFRESH_TOKEN: &str = "tok-refresh";

pub fn credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: "admin-ui".into(),
        client_secret: "s3cr3t".into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct Db {
    next_id: u64,
    pub artists: BTreeMap<u64, Value>,
    pub albums: BTreeMap<u64, Value>,
    pub songs: BTreeMap<u64, Value>,
    pub uploads: Vec<Upload>,
    pub token_requests: Vec<HashMap<String, String>>,
    pub list_auth: Vec<Option<String>>,
}

impl Db {
    fn id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<Db>>;

pub struct FakeApi {
    pub base_url: String,
    pub db: Shared,
}

impl FakeApi {
    pub async fn start() -> Self {
        let db: Shared = Arc::default();

        let router = Router::new()
            .route("/o/token/", post(token))
            .route("/api/artistas/", get(list_artists).post(create_artist))
            .route(
                "/api/artistas/{id}/",
                put(update_artist).delete(delete_artist),
            )
            .route("/api/albumes/", get(list_albums).post(create_album))
            .route("/api/albumes/{id}/", put(update_album).delete(delete_album))
            .route("/api/canciones/", get(list_songs).post(create_song))
            .route("/api/canciones/{id}/", put(update_song).delete(delete_song))
            .with_state(db.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            db,
        }
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(&self.base_url, credentials(), Session::ephemeral()).unwrap()
    }

    pub async fn signed_in(&self) -> Catalog {
        let catalog = self.catalog();
        catalog.login(USERNAME, PASSWORD).await.unwrap();
        catalog
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.db.lock().unwrap().uploads.clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {ACCESS_TOKEN}").as_str())
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": message }))).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" }))).into_response()
}

fn created(result: Result<Value, Response>) -> Response {
    match result {
        Ok(entity) => (StatusCode::CREATED, Json(entity)).into_response(),
        Err(response) => response,
    }
}

fn saved(result: Result<Value, Response>) -> Response {
    match result {
        Ok(entity) => Json(entity).into_response(),
        Err(response) => response,
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "credentials were not provided" })),
    )
        .into_response()
}

async fn token(State(db): State<Shared>, Form(form): Form<HashMap<String, String>>) -> Response {
    let ok = form.get("grant_type").map(String::as_str) == Some("password")
        && form.get("username").map(String::as_str) == Some(USERNAME)
        && form.get("password").map(String::as_str) == Some(PASSWORD)
        && form.get("client_id") == Some(&credentials().client_id)
        && form.get("client_secret") == Some(&credentials().client_secret);
    db.lock().unwrap().token_requests.push(form);

    if !ok {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": ACCESS_TOKEN,
        "refresh_token": REFRESH_TOKEN,
        "token_type": "Bearer",
        "expires_in": 36000,
    }))
    .into_response()
}

struct Parts {
    text: HashMap<String, String>,
    file: Option<Upload>,
}

async fn read_multipart(mut multipart: Multipart) -> Parts {
    let mut parts = Parts {
        text: HashMap::new(),
        file: None,
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.unwrap().to_vec();
                parts.file = Some(Upload {
                    field: name,
                    file_name,
                    bytes,
                });
            }
            None => {
                let value = field.text().await.unwrap();
                parts.text.insert(name, value);
            }
        }
    }
    parts
}

fn media_url(file_name: &str) -> String {
    format!("http://media.local/{file_name}")
}

fn listing(db: &Shared, headers: &HeaderMap, pick: fn(&Db) -> &BTreeMap<u64, Value>) -> Json<Vec<Value>> {
    let mut db = db.lock().unwrap();
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    db.list_auth.push(auth);
    Json(pick(&db).values().cloned().collect())
}

fn removal(
    db: &Shared,
    headers: &HeaderMap,
    id: u64,
    pick: fn(&mut Db) -> &mut BTreeMap<u64, Value>,
) -> Response {
    if !authorized(headers) {
        return unauthorized();
    }
    match pick(&mut db.lock().unwrap()).remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn list_artists(State(db): State<Shared>, headers: HeaderMap) -> Json<Vec<Value>> {
    listing(&db, &headers, |db| &db.artists)
}

async fn list_albums(State(db): State<Shared>, headers: HeaderMap) -> Json<Vec<Value>> {
    listing(&db, &headers, |db| &db.albums)
}

async fn list_songs(State(db): State<Shared>, headers: HeaderMap) -> Json<Vec<Value>> {
    listing(&db, &headers, |db| &db.songs)
}

async fn delete_artist(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    removal(&db, &headers, id, |db| &mut db.artists)
}

async fn delete_album(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    removal(&db, &headers, id, |db| &mut db.albums)
}

async fn delete_song(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    removal(&db, &headers, id, |db| &mut db.songs)
}

fn save_artist(db: &Shared, id: Option<u64>, parts: Parts) -> Result<Value, Response> {
    let name = parts.text.get("nombre").cloned().unwrap_or_default();
    if name.is_empty() {
        return Err(bad_request("nombre is required"));
    }

    let mut db = db.lock().unwrap();
    let id = match id {
        Some(id) if !db.artists.contains_key(&id) => {
            return Err(not_found());
        }
        Some(id) => id,
        None => db.id(),
    };

    let previous_image = db.artists.get(&id).map(|a| a["imagen"].clone());
    let image = match &parts.file {
        Some(upload) => json!(media_url(&upload.file_name)),
        None => previous_image.unwrap_or(Value::Null),
    };
    if let Some(upload) = parts.file {
        db.uploads.push(upload);
    }

    let artist = json!({
        "id": id,
        "nombre": name,
        "genero": parts.text.get("genero").cloned().unwrap_or_default(),
        "pais": parts.text.get("pais").cloned().unwrap_or_default(),
        "imagen": image,
    });
    db.artists.insert(id, artist.clone());
    Ok(artist)
}

async fn create_artist(State(db): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let parts = read_multipart(multipart).await;
    created(save_artist(&db, None, parts))
}

async fn update_artist(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let parts = read_multipart(multipart).await;
    saved(save_artist(&db, Some(id), parts))
}

fn save_album(db: &Shared, id: Option<u64>, parts: Parts) -> Result<Value, Response> {
    let title = parts.text.get("titulo").cloned().unwrap_or_default();
    let Ok(year) = parts.text.get("anio_lanzamiento").cloned().unwrap_or_default().parse::<i32>() else {
        return Err(bad_request("anio_lanzamiento must be a number"));
    };
    let Ok(artist) = parts.text.get("artista").cloned().unwrap_or_default().parse::<u64>() else {
        return Err(bad_request("artista is required"));
    };
    if title.is_empty() {
        return Err(bad_request("titulo is required"));
    }

    let mut db = db.lock().unwrap();
    if !db.artists.contains_key(&artist) {
        return Err(bad_request("artista does not exist"));
    }
    let id = match id {
        Some(id) if !db.albums.contains_key(&id) => {
            return Err(not_found());
        }
        Some(id) => id,
        None => db.id(),
    };

    let previous_cover = db.albums.get(&id).map(|a| a["portada"].clone());
    let cover = match &parts.file {
        Some(upload) => json!(media_url(&upload.file_name)),
        None => previous_cover.unwrap_or(Value::Null),
    };
    if let Some(upload) = parts.file {
        db.uploads.push(upload);
    }

    let album = json!({
        "id": id,
        "titulo": title,
        "anio_lanzamiento": year,
        "artista": artist,
        "portada": cover,
    });
    db.albums.insert(id, album.clone());
    Ok(album)
}

async fn create_album(State(db): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let parts = read_multipart(multipart).await;
    created(save_album(&db, None, parts))
}

async fn update_album(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let parts = read_multipart(multipart).await;
    saved(save_album(&db, Some(id), parts))
}

fn save_song(db: &Shared, id: Option<u64>, body: Value) -> Result<Value, Response> {
    let title = body["titulo"].as_str().unwrap_or_default().to_string();
    let duration = body["duracion"].as_str().unwrap_or_default().to_string();
    let Some(album) = body["album"].as_u64() else {
        return Err(bad_request("album is required"));
    };
    if title.is_empty() {
        return Err(bad_request("titulo is required"));
    }

    let mut db = db.lock().unwrap();
    if !db.albums.contains_key(&album) {
        return Err(bad_request("album does not exist"));
    }
    let id = match id {
        Some(id) if !db.songs.contains_key(&id) => {
            return Err(not_found());
        }
        Some(id) => id,
        None => db.id(),
    };

    let song = json!({ "id": id, "titulo": title, "duracion": duration, "album": album });
    db.songs.insert(id, song.clone());
    Ok(song)
}

async fn create_song(State(db): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    created(save_song(&db, None, body))
}

async fn update_song(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    saved(save_song(&db, Some(id), body))
}
