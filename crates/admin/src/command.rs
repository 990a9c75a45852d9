//! One line of input, parsed and applied to the shell.

use std::{fmt, path::PathBuf};

use catalog::{CatalogError, id::AlbumId, image::LocalImage, resource::ResourceKind};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::{
    backend::Backend,
    console::Prompt,
    panel::{FieldError, Outcome},
    shell::Shell,
};

#[derive(Debug, Parser)]
#[command(multicall = true, disable_help_subcommand = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Go to /, /artist/<id>, /albums or /songs
    Go { path: String },
    /// Open an artist's page
    Open { id: u64 },
    /// Sign in; the password is asked for
    Login { username: String },
    /// Sign out and forget the stored session
    Logout,
    /// Start a new entity
    New { kind: Kind },
    /// Edit a listed entity
    Edit { kind: Kind, id: u64 },
    /// Delete a listed entity (asks first)
    Delete { kind: Kind, id: u64 },
    /// Set a field on the open form; quote the value to keep its spacing
    Set {
        field: String,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Attach a picture to the open form
    Image { path: PathBuf },
    /// Submit the open form
    Save,
    /// Close the open form without saving
    Cancel,
    /// Show only one album's songs on an artist page
    Pick { album: AlbumId },
    /// Show all of the artist's songs again
    Unpick,
    /// Re-fetch the current page
    Refresh,
    /// Print the current page
    Show,
    /// Hide notices
    Dismiss,
    /// List commands
    Help,
    /// Leave
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Artist,
    Album,
    Song,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ResourceKind::from(*self), f)
    }
}

impl From<ResourceKind> for Kind {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Artist => Kind::Artist,
            ResourceKind::Album => Kind::Album,
            ResourceKind::Song => Kind::Song,
        }
    }
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Artist => ResourceKind::Artist,
            Kind::Album => ResourceKind::Album,
            Kind::Song => ResourceKind::Song,
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Parse(#[from] clap::Error),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("there is no {0} list on this page")]
    NotHere(Kind),

    #[error("sign in to make changes")]
    Denied,

    #[error("no {kind} with id {id} on this page")]
    Missing { kind: Kind, id: u64 },

    #[error("no form is open")]
    NoForm,

    #[error("`{0}` only works on an artist page")]
    NotDetail(&'static str),

    #[error("could not read {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Render,
    Text(String),
    Quit,
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = Line::try_parse_from(words(line))?;
    Ok(line.command)
}

/// Splits on whitespace. Single or double quotes keep a word together, spaces
/// included; an unclosed quote runs to the end of the line.
fn words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quote = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => word.get_or_insert_default().push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                word.get_or_insert_default();
            }
            None if c.is_whitespace() => words.extend(word.take()),
            None => word.get_or_insert_default().push(c),
        }
    }
    words.extend(word);
    words
}

pub fn help() -> String {
    let mut text = String::from("commands:\n");
    for command in Line::command().get_subcommands() {
        let about = command.get_about().map(|a| a.to_string()).unwrap_or_default();
        text.push_str(&format!("  {:<10} {about}\n", command.get_name()));
    }
    text
}

fn outcome(result: Outcome, kind: Kind, id: Option<u64>) -> Result<(), CommandError> {
    match result {
        Outcome::Done | Outcome::Declined | Outcome::Failed => Ok(()),
        Outcome::Denied => Err(CommandError::Denied),
        Outcome::Missing => match id {
            Some(id) => Err(CommandError::Missing { kind, id }),
            None => Err(CommandError::NoForm),
        },
    }
}

/// Runs `$body` against the panel for `$kind` on the current page.
macro_rules! with_panel {
    ($shell:expr, $kind:expr, |$panel:ident| $body:expr) => {
        match $kind {
            Kind::Artist => {
                let $panel = $shell
                    .view_mut()
                    .artists_mut()
                    .ok_or(CommandError::NotHere(Kind::Artist))?;
                $body
            }
            Kind::Album => {
                let $panel = $shell
                    .view_mut()
                    .albums_mut()
                    .ok_or(CommandError::NotHere(Kind::Album))?;
                $body
            }
            Kind::Song => {
                let $panel = $shell
                    .view_mut()
                    .songs_mut()
                    .ok_or(CommandError::NotHere(Kind::Song))?;
                $body
            }
        }
    };
}

fn editing<B: Backend>(shell: &Shell<B>) -> Result<Kind, CommandError> {
    shell
        .view()
        .editing()
        .map(Kind::from)
        .ok_or(CommandError::NoForm)
}

pub async fn execute<B: Backend>(
    shell: &mut Shell<B>,
    prompt: &mut impl Prompt,
    command: Command,
) -> Result<Reply, CommandError> {
    match command {
        Command::Go { path } => {
            shell.navigate(&path).await;
        }
        Command::Open { id } => {
            shell.navigate(&format!("/artist/{id}")).await;
        }
        Command::Login { username } => {
            let Some(password) = prompt.password().await else {
                return Ok(Reply::Render);
            };
            shell.login(&username, &password).await;
        }
        Command::Logout => shell.logout().await,
        Command::New { kind } => {
            shell.view_mut().cancel_forms();
            let result = with_panel!(shell, kind, |panel| panel.open_create());
            outcome(result, kind, None)?;
        }
        Command::Edit { kind, id } => {
            shell.view_mut().cancel_forms();
            let result = with_panel!(shell, kind, |panel| panel.open_edit(id.into()));
            outcome(result, kind, Some(id))?;
        }
        Command::Delete { kind, id } => {
            let result = with_panel!(shell, kind, |panel| panel.remove(id.into(), prompt).await);
            outcome(result, kind, Some(id))?;
        }
        Command::Set { field, value } => {
            let kind = editing(shell)?;
            let value = value.join(" ");
            let result = with_panel!(shell, kind, |panel| panel.set_field(&field, &value))?;
            outcome(result, kind, None)?;
        }
        Command::Image { path } => {
            let kind = editing(shell)?;
            let opened = LocalImage::open(&path).await;
            let image = opened.map_err(|source| CommandError::Image { path, source })?;
            let result = with_panel!(shell, kind, |panel| panel.select_file(image))?;
            outcome(result, kind, None)?;
        }
        Command::Save => {
            let kind = editing(shell)?;
            let result = with_panel!(shell, kind, |panel| panel.save().await);
            outcome(result, kind, None)?;
        }
        Command::Cancel => shell.view_mut().cancel_forms(),
        Command::Pick { album } => {
            let detail = shell
                .view_mut()
                .detail_mut()
                .ok_or(CommandError::NotDetail("pick"))?;
            let result = detail.select_album(album);
            outcome(result, Kind::Album, Some(album.get()))?;
        }
        Command::Unpick => {
            shell
                .view_mut()
                .detail_mut()
                .ok_or(CommandError::NotDetail("unpick"))?
                .clear_album_filter();
        }
        Command::Refresh => {
            let route = shell.route().to_string();
            shell.navigate(&route).await;
        }
        Command::Show => {}
        Command::Dismiss => shell.dismiss(),
        Command::Help => return Ok(Reply::Text(help())),
        Command::Quit => return Ok(Reply::Quit),
    }

    shell.sync().await;
    Ok(Reply::Render)
}
