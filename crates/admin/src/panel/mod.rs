//! One CRUD surface per resource: a cached list, an edit modal and a revision counter.
//!
//! A panel never patches its list in place. Every successful mutation bumps the revision,
//! which makes the list stale, and the next [`Panel::sync`] re-fetches the whole collection.

pub mod fields;
pub mod listing;

use std::future::Future;

use bytesize::ByteSize;
use catalog::{
    CatalogError,
    album::Albums,
    artist::Artists,
    image::{Image, LocalImage},
    resource::Collection,
    song::Songs,
};
use futures::try_join;

use crate::{
    access::Access,
    backend::Backend,
    bus::{Change, ChangeBus, ChangeOp},
};
pub use fields::{Editable, FieldError};
pub use listing::{Listing, SongFilter};

pub type ArtistPanel<B> = Panel<Artists, B>;
pub type AlbumPanel<B> = Panel<Albums, B>;
pub type SongPanel<B> = Panel<Songs, B>;

/// Interactive yes/no question asked before destructive actions.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> impl Future<Output = bool>;
}

/// A fixed answer.
impl Confirm for bool {
    fn confirm(&mut self, _question: &str) -> impl Future<Output = bool> {
        std::future::ready(*self)
    }
}

#[derive(Debug)]
pub enum Draft<R: Listing> {
    New(R::Fields),
    Editing(R::Id, R::Fields),
}

impl<R: Listing> Draft<R> {
    pub fn fields(&self) -> &R::Fields {
        match self {
            Draft::New(fields) | Draft::Editing(_, fields) => fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut R::Fields {
        match self {
            Draft::New(fields) | Draft::Editing(_, fields) => fields,
        }
    }

    pub fn target(&self) -> Option<R::Id> {
        match self {
            Draft::New(_) => None,
            Draft::Editing(id, _) => Some(*id),
        }
    }
}

#[derive(Debug)]
pub struct Form<R: Listing> {
    pub draft: Draft<R>,
    pub preview: Option<String>,
    pub error: Option<String>,
}

impl<R: Listing> Form<R> {
    fn new(draft: Draft<R>) -> Self {
        let preview = draft.fields().image().map(preview);
        Self {
            draft,
            preview,
            error: None,
        }
    }
}

#[derive(Debug)]
pub enum Modal<R: Listing> {
    Closed,
    Open(Form<R>),
}

impl<R: Listing> Modal<R> {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }
}

/// Result of a user action on a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user answered no.
    Declined,
    /// The server call failed; the panel shows a notice.
    Failed,
    /// Signed out; mutations are not offered.
    Denied,
    /// Nothing to act on (no open form, unknown id).
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FetchKey {
    revision: u64,
    external: u64,
}

/// Stamp handed out when a fetch starts; the response is only applied if it still matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(FetchKey);

pub struct Panel<R: Listing, B> {
    backend: B,
    bus: Option<ChangeBus>,
    access: Access,
    filter: R::Filter,
    items: Vec<R::Entity>,
    related: R::Related,
    modal: Modal<R>,
    revision: u64,
    external: u64,
    loaded: Option<FetchKey>,
    notice: Option<String>,
}

impl<R: Listing, B: Backend> Panel<R, B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bus: None,
            access: Access::Anonymous,
            filter: R::Filter::default(),
            items: Vec::new(),
            related: R::Related::default(),
            modal: Modal::Closed,
            revision: 0,
            external: 0,
            loaded: None,
            notice: None,
        }
    }

    pub fn with_bus(mut self, bus: ChangeBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_filter(mut self, filter: R::Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Signing out also drops any half-edited form.
    pub fn set_access(&mut self, access: Access) {
        self.access = access;
        if !access.can_mutate() {
            self.modal = Modal::Closed;
        }
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: R::Filter) {
        self.filter = filter;
    }

    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    pub fn related(&self) -> &R::Related {
        &self.related
    }

    /// The fetched list narrowed to the current filter.
    pub fn displayed(&self) -> Vec<&R::Entity> {
        self.items
            .iter()
            .filter(|item| R::visible(item, &self.filter, &self.related))
            .collect()
    }

    pub fn find(&self, id: R::Id) -> Option<&R::Entity> {
        self.items.iter().find(|item| R::id(item) == id)
    }

    /// Like [`Panel::find`], limited to what the current filter shows.
    pub fn listed(&self, id: R::Id) -> Option<&R::Entity> {
        self.find(id).filter(|item| R::visible(item, &self.filter, &self.related))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn modal(&self) -> &Modal<R> {
        &self.modal
    }

    pub fn form(&self) -> Option<&Form<R>> {
        match &self.modal {
            Modal::Open(form) => Some(form),
            Modal::Closed => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    /// Refresh signal owned by a parent view; a new value makes the list stale.
    pub fn set_external(&mut self, signal: u64) {
        self.external = signal;
    }

    fn key(&self) -> FetchKey {
        FetchKey {
            revision: self.revision,
            external: self.external,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.loaded != Some(self.key())
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.key())
    }

    /// Replaces the list wholesale, unless the panel moved on since `ticket` was issued.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<(Vec<R::Entity>, R::Related), CatalogError>,
    ) -> bool {
        if ticket.0 != self.key() {
            tracing::debug!(kind = %R::KIND, "discarding stale fetch");
            return false;
        }

        match result {
            Ok((items, related)) => {
                self.items = items;
                self.related = related;
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, "failed to load list");
                self.items.clear();
                self.related = R::Related::default();
            }
        }

        self.loaded = Some(ticket.0);
        true
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = {
            let collection = R::collection(&self.backend);
            try_join!(collection.list(), R::related(&self.backend))
        };
        self.apply(ticket, result);
    }

    /// Re-fetches only if the revision or the external signal changed since the last load.
    pub async fn sync(&mut self) {
        if self.is_stale() {
            self.refresh().await;
        }
    }

    pub fn open_create(&mut self) -> Outcome {
        if !self.access.can_mutate() {
            return Outcome::Denied;
        }
        self.modal = Modal::Open(Form::new(Draft::New(R::prefill(&self.filter))));
        Outcome::Done
    }

    pub fn open_edit(&mut self, id: R::Id) -> Outcome {
        if !self.access.can_mutate() {
            return Outcome::Denied;
        }
        let Some(entity) = self.listed(id) else {
            return Outcome::Missing;
        };
        let draft = Draft::Editing(id, R::fields(entity));
        self.modal = Modal::Open(Form::new(draft));
        Outcome::Done
    }

    pub fn cancel(&mut self) {
        self.modal = Modal::Closed;
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<Outcome, FieldError> {
        let Modal::Open(form) = &mut self.modal else {
            return Ok(Outcome::Missing);
        };
        form.draft.fields_mut().set(field, value)?;
        Ok(Outcome::Done)
    }

    /// Puts a freshly picked file on the draft. Nothing is sent until [`Panel::save`].
    pub fn select_file(&mut self, image: LocalImage) -> Result<Outcome, FieldError> {
        let Modal::Open(form) = &mut self.modal else {
            return Ok(Outcome::Missing);
        };
        let image = Image::Local(image);
        let shown = preview(&image);
        form.draft.fields_mut().set_image(image)?;
        form.preview = Some(shown);
        Ok(Outcome::Done)
    }

    pub async fn save(&mut self) -> Outcome {
        if !self.access.can_mutate() {
            return Outcome::Denied;
        }
        let collection = R::collection(&self.backend);
        let Modal::Open(form) = &mut self.modal else {
            return Outcome::Missing;
        };

        form.error = None;
        let result = match &form.draft {
            Draft::New(fields) => collection
                .create(fields)
                .await
                .map(|entity| (ChangeOp::Created, R::id(&entity))),
            Draft::Editing(id, fields) => collection
                .update(*id, fields)
                .await
                .map(|entity| (ChangeOp::Updated, R::id(&entity))),
        };

        match result {
            Ok((op, id)) => {
                self.modal = Modal::Closed;
                self.revision += 1;
                self.publish(op, id);
                Outcome::Done
            }
            Err(e) => {
                tracing::error!(kind = %R::KIND, error = %e, "save failed");
                let message = format!("could not save {}: {e}", R::KIND);
                form.error = Some(message.clone());
                self.notice = Some(message);
                Outcome::Failed
            }
        }
    }

    pub async fn remove(&mut self, id: R::Id, confirm: &mut impl Confirm) -> Outcome {
        if !self.access.can_mutate() {
            return Outcome::Denied;
        }
        if self.listed(id).is_none() {
            return Outcome::Missing;
        }
        if !confirm.confirm(&format!("delete {} {id}?", R::KIND)).await {
            return Outcome::Declined;
        }

        match R::collection(&self.backend).delete(id).await {
            Ok(()) => {
                self.revision += 1;
                self.publish(ChangeOp::Deleted, id);
                Outcome::Done
            }
            Err(e) => {
                tracing::error!(kind = %R::KIND, %id, error = %e, "delete failed");
                self.notice = Some(format!("could not delete {} {id}: {e}", R::KIND));
                Outcome::Failed
            }
        }
    }

    fn publish(&self, op: ChangeOp, id: R::Id) {
        if let Some(bus) = &self.bus {
            bus.publish(Change {
                kind: R::KIND,
                op,
                id: Some(id.into()),
            });
        }
    }
}

fn preview(image: &Image) -> String {
    match image {
        Image::Remote(url) => url.clone(),
        Image::Local(local) => format!("{} ({})", local.file_name, ByteSize(local.len() as u64)),
    }
}
