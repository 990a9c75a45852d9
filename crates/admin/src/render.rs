//! Plain-text rendering of the active view.

use std::fmt::Write;

use catalog::{
    album::Album,
    artist::Artist,
    id::{AlbumId, ArtistId},
};
use unicode_ellipsis::truncate_str;

use crate::{
    access::Access,
    backend::Backend,
    detail::{ArtistDetail, ArtistState},
    panel::{AlbumPanel, ArtistPanel, Editable, Form, Listing, Panel, SongPanel, listing},
    shell::{Shell, View},
};

const TITLE_WIDTH: usize = 40;
const UNKNOWN: &str = "unknown";

pub fn shell<B: Backend>(shell: &Shell<B>) -> String {
    let mut out = String::new();
    let status = match shell.access() {
        Access::Authenticated => "signed in",
        Access::Anonymous => "anonymous",
    };
    writeln!(out, "[{}] {status}", shell.route()).ok();
    if let Some(notice) = shell.notice() {
        writeln!(out, "! {notice}").ok();
    }

    match shell.view() {
        View::Artists(panel) => artists(&mut out, panel),
        View::Artist(detail) => artist_detail(&mut out, detail),
        View::Albums(panel) => albums(&mut out, panel, "no albums in the catalog"),
        View::Songs(panel) => songs(&mut out, panel, "songs"),
    }
    out
}

fn title(text: &str) -> String {
    truncate_str(text, TITLE_WIDTH).into()
}

fn artist_name(artists: &[Artist], id: ArtistId) -> &str {
    artists
        .iter()
        .find(|a| a.id == id)
        .map_or(UNKNOWN, |a| a.name.as_str())
}

fn album_by_id(albums: &[Album], id: AlbumId) -> Option<&Album> {
    albums.iter().find(|a| a.id == id)
}

fn header<R: Listing, B: Backend>(out: &mut String, panel: &Panel<R, B>, heading: &str) {
    writeln!(out, "\n{heading}").ok();
    if panel.access().can_mutate() {
        writeln!(
            out,
            "  `new {kind}` to add, `edit {kind} <id>` or `delete {kind} <id>` to change",
            kind = R::KIND
        )
        .ok();
    }
    if let Some(notice) = panel.notice() {
        writeln!(out, "  ! {notice}").ok();
    }
}

fn empty<R: Listing, B: Backend>(out: &mut String, panel: &Panel<R, B>, message: &str) {
    writeln!(out, "  {message}").ok();
    if panel.access().can_mutate() {
        writeln!(out, "  use `new {}` to add one", R::KIND).ok();
    }
}

fn form<R: Listing>(out: &mut String, form: &Form<R>) {
    match form.draft.target() {
        None => writeln!(out, "\n-- new {} --", R::KIND).ok(),
        Some(id) => writeln!(out, "\n-- edit {} {id} --", R::KIND).ok(),
    };

    let fields = form.draft.fields();
    for field in <R::Fields as Editable>::FIELDS {
        let value = fields.get(field).unwrap_or_default();
        writeln!(out, "  {field}: {value}").ok();
    }
    if let Some(preview) = &form.preview {
        writeln!(out, "  picture: {preview}").ok();
    }
    if let Some(error) = &form.error {
        writeln!(out, "  error: {error}").ok();
    }
}

fn artists<B: Backend>(out: &mut String, panel: &ArtistPanel<B>) {
    header(out, panel, "artists");
    let shown = panel.displayed();
    if shown.is_empty() {
        empty(out, panel, "no artists yet");
    }

    for artist in shown {
        write!(
            out,
            "  #{}  {}  {}  {}",
            artist.id,
            title(&artist.name),
            artist.genre,
            artist.country
        )
        .ok();
        if let Some(image) = &artist.image {
            write!(out, "  image: {image}").ok();
        }
        writeln!(out).ok();
    }

    if let Some(open) = panel.form() {
        form(out, open);
    }
}

fn album_rows(out: &mut String, albums: &[&Album], artists: &[Artist], selected: Option<AlbumId>) {
    for album in albums {
        let marker = if Some(album.id) == selected { "*" } else { " " };
        write!(
            out,
            " {marker}#{}  {} ({})  by {}",
            album.id,
            title(&album.title),
            album.release_year,
            artist_name(artists, album.artist)
        )
        .ok();
        if let Some(cover) = &album.cover {
            write!(out, "  cover: {cover}").ok();
        }
        writeln!(out).ok();
    }
}

fn albums<B: Backend>(out: &mut String, panel: &AlbumPanel<B>, when_empty: &str) {
    header(out, panel, "albums");
    let shown = panel.displayed();
    if shown.is_empty() {
        empty(out, panel, when_empty);
    }
    album_rows(out, &shown, panel.related(), None);
    album_form(out, panel);
}

fn album_form<B: Backend>(out: &mut String, panel: &AlbumPanel<B>) {
    if let Some(open) = panel.form() {
        form(out, open);
        let choices: Vec<_> = panel
            .related()
            .iter()
            .map(|a| format!("#{} {}", a.id, title(&a.name)))
            .collect();
        writeln!(out, "  artists: {}", choices.join(", ")).ok();
    }
}

fn songs<B: Backend>(out: &mut String, panel: &SongPanel<B>, heading: &str) {
    header(out, panel, heading);
    let shown = panel.displayed();
    if shown.is_empty() {
        empty(out, panel, "no songs available");
    }

    let albums = panel.related();
    for song in shown {
        let album = album_by_id(albums, song.album);
        write!(
            out,
            "  #{}  {}  {}  on {}",
            song.id,
            title(&song.title),
            song.duration,
            album.map_or(UNKNOWN, |a| a.title.as_str())
        )
        .ok();
        if let Some(cover) = album.and_then(|a| a.cover.as_ref()) {
            write!(out, "  cover: {cover}").ok();
        }
        writeln!(out).ok();
    }

    if let Some(open) = panel.form() {
        form(out, open);
        let choices: Vec<_> = listing::album_choices(albums, panel.filter())
            .into_iter()
            .map(|a| format!("#{} {}", a.id, title(&a.title)))
            .collect();
        writeln!(out, "  albums: {}", choices.join(", ")).ok();
    }
}

fn artist_detail<B: Backend>(out: &mut String, detail: &ArtistDetail<B>) {
    let artist = match detail.artist() {
        ArtistState::Loading => {
            writeln!(out, "\nloading artist {}", detail.artist_id()).ok();
            return;
        }
        ArtistState::NotFound => {
            writeln!(out, "\nartist not found").ok();
            return;
        }
        ArtistState::Found(artist) => artist,
    };

    writeln!(out, "\n{}", artist.name).ok();
    writeln!(out, "  genre: {}", artist.genre).ok();
    writeln!(out, "  country: {}", artist.country).ok();
    if let Some(image) = &artist.image {
        writeln!(out, "  image: {image}").ok();
    }

    let panel = detail.albums();
    header(out, panel, "albums");
    let shown = panel.displayed();
    if shown.is_empty() {
        empty(out, panel, "this artist has no albums yet");
    }
    let selected = detail.selected_album().map(|a| a.id);
    album_rows(out, &shown, panel.related(), selected);
    album_form(out, panel);

    let heading = match detail.selected_album() {
        Some(album) => format!("songs on {}", title(&album.title)),
        None => "songs".to_string(),
    };
    songs(out, detail.songs(), &heading);
}
