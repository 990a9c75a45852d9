//! Route-mapped top level: picks the active view and owns the session capability.

use std::fmt;

use catalog::{id::ArtistId, resource::ResourceKind};

use crate::{
    access::Access,
    backend::Backend,
    bus::ChangeBus,
    detail::ArtistDetail,
    panel::{AlbumPanel, ArtistPanel, Panel, SongPanel},
    render,
};

pub const LOGIN_FAILED: &str = "invalid credentials or connection error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Artists,
    Artist(ArtistId),
    Albums,
    Songs,
}

impl Route {
    /// Unknown paths land on the artist grid.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/');

        let route = match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Some(Route::Artists),
            (Some("albums"), None, None) => Some(Route::Albums),
            (Some("songs"), None, None) => Some(Route::Songs),
            (Some("artist"), Some(id), None) => id.parse().ok().map(Route::Artist),
            _ => None,
        };

        route.unwrap_or_else(|| {
            tracing::debug!(path, "unknown route, falling back to /");
            Route::Artists
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Artists => f.write_str("/"),
            Route::Artist(id) => write!(f, "/artist/{id}"),
            Route::Albums => f.write_str("/albums"),
            Route::Songs => f.write_str("/songs"),
        }
    }
}

pub enum View<B> {
    Artists(ArtistPanel<B>),
    Artist(Box<ArtistDetail<B>>),
    Albums(AlbumPanel<B>),
    Songs(SongPanel<B>),
}

impl<B: Backend> View<B> {
    fn mount(route: Route, backend: &B, bus: &ChangeBus, access: Access) -> Self {
        match route {
            Route::Artists => View::Artists(
                Panel::new(backend.clone())
                    .with_bus(bus.clone())
                    .with_access(access),
            ),
            Route::Artist(id) => View::Artist(Box::new(ArtistDetail::new(
                backend.clone(),
                bus,
                access,
                id,
            ))),
            Route::Albums => View::Albums(
                Panel::new(backend.clone())
                    .with_bus(bus.clone())
                    .with_access(access),
            ),
            Route::Songs => View::Songs(
                Panel::new(backend.clone())
                    .with_bus(bus.clone())
                    .with_access(access),
            ),
        }
    }

    fn set_access(&mut self, access: Access) {
        match self {
            View::Artists(panel) => panel.set_access(access),
            View::Artist(detail) => detail.set_access(access),
            View::Albums(panel) => panel.set_access(access),
            View::Songs(panel) => panel.set_access(access),
        }
    }

    pub async fn sync(&mut self) {
        match self {
            View::Artists(panel) => panel.sync().await,
            View::Artist(detail) => detail.sync().await,
            View::Albums(panel) => panel.sync().await,
            View::Songs(panel) => panel.sync().await,
        }
    }

    pub fn artists_mut(&mut self) -> Option<&mut ArtistPanel<B>> {
        match self {
            View::Artists(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn albums_mut(&mut self) -> Option<&mut AlbumPanel<B>> {
        match self {
            View::Artist(detail) => Some(detail.albums_mut()),
            View::Albums(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn songs_mut(&mut self) -> Option<&mut SongPanel<B>> {
        match self {
            View::Artist(detail) => Some(detail.songs_mut()),
            View::Songs(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn detail_mut(&mut self) -> Option<&mut ArtistDetail<B>> {
        match self {
            View::Artist(detail) => Some(&mut **detail),
            _ => None,
        }
    }

    /// Kind of the form currently open, if any.
    pub fn editing(&self) -> Option<ResourceKind> {
        match self {
            View::Artists(panel) => panel.modal().is_open().then_some(ResourceKind::Artist),
            View::Artist(detail) => {
                if detail.albums().modal().is_open() {
                    Some(ResourceKind::Album)
                } else {
                    detail.songs().modal().is_open().then_some(ResourceKind::Song)
                }
            }
            View::Albums(panel) => panel.modal().is_open().then_some(ResourceKind::Album),
            View::Songs(panel) => panel.modal().is_open().then_some(ResourceKind::Song),
        }
    }

    /// Only one form is open at a time.
    pub fn cancel_forms(&mut self) {
        match self {
            View::Artists(panel) => panel.cancel(),
            View::Artist(detail) => {
                detail.albums_mut().cancel();
                detail.songs_mut().cancel();
            }
            View::Albums(panel) => panel.cancel(),
            View::Songs(panel) => panel.cancel(),
        }
    }

    /// Drops every notice shown by the view's panels.
    pub fn dismiss(&mut self) {
        match self {
            View::Artists(panel) => panel.dismiss(),
            View::Artist(detail) => {
                detail.albums_mut().dismiss();
                detail.songs_mut().dismiss();
            }
            View::Albums(panel) => panel.dismiss(),
            View::Songs(panel) => panel.dismiss(),
        }
    }
}

pub struct Shell<B> {
    backend: B,
    bus: ChangeBus,
    access: Access,
    route: Route,
    view: View<B>,
    notice: Option<String>,
}

impl<B: Backend> Shell<B> {
    /// Starts on `/` with the capability implied by any persisted session.
    pub async fn open(backend: B) -> Self {
        let bus = ChangeBus::new();
        let access = Access::from_session(backend.has_session());
        let view = View::mount(Route::Artists, &backend, &bus, access);

        let mut shell = Self {
            backend,
            bus,
            access,
            route: Route::Artists,
            view,
            notice: None,
        };
        shell.view.sync().await;
        shell
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn view(&self) -> &View<B> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View<B> {
        &mut self.view
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
        self.view.dismiss();
    }

    /// Mounts a fresh view for `path`, so every visit starts from a full fetch.
    pub async fn navigate(&mut self, path: &str) -> Route {
        let route = Route::parse(path);
        tracing::debug!(%route, "navigating");

        self.route = route;
        self.view = View::mount(route, &self.backend, &self.bus, self.access);
        match &mut self.view {
            View::Artist(detail) => detail.activate().await,
            view => view.sync().await,
        }
        route
    }

    fn set_access(&mut self, access: Access) {
        self.access = access;
        self.view.set_access(access);
    }

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        let result = self.backend.login(username, password).await;
        match result {
            Ok(()) => {
                tracing::info!(username, "signed in");
                self.notice = None;
                self.set_access(Access::Authenticated);
                true
            }
            Err(e) => {
                tracing::error!(username, error = %e, "login failed");
                self.notice = Some(LOGIN_FAILED.to_string());
                false
            }
        }
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.backend.logout() {
            tracing::error!(error = %e, "failed to clear stored session");
            self.notice = Some(format!("could not clear session: {e}"));
        }
        self.set_access(Access::Anonymous);
        tracing::info!("signed out");
        self.navigate("/").await;
    }

    pub async fn sync(&mut self) {
        self.view.sync().await;
    }

    pub fn render(&self) -> String {
        render::shell(self)
    }
}
