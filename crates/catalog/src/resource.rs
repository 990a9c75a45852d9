use std::{fmt, future::Future, hash::Hash, marker::PhantomData};

use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

use crate::{Catalog, CatalogError, image::LocalImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Artist,
    Album,
    Song,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Artist => "artist",
            ResourceKind::Album => "album",
            ResourceKind::Song => "song",
        })
    }
}

/// One REST collection of the catalog API.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;
    /// Collection path relative to the API root, with a trailing slash.
    const PATH: &'static str;

    type Id: Copy + Eq + Hash + Into<u64> + fmt::Display + fmt::Debug + Send + Sync + 'static;
    type Entity: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;
    /// Editable part of an entity, as held by a draft.
    type Fields: Clone + fmt::Debug + Default + Send + Sync + 'static;

    fn id(entity: &Self::Entity) -> Self::Id;
    fn fields(entity: &Self::Entity) -> Self::Fields;
    fn encode(fields: &Self::Fields) -> Payload;
}

/// Request body for create/update.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub text: Vec<(&'static str, String)>,
    pub file: Option<(&'static str, LocalImage)>,
}

impl MultipartBody {
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.text.push((name, value.into()));
        self
    }

    pub fn file(mut self, name: &'static str, image: Option<&LocalImage>) -> Self {
        self.file = image.map(|image| (name, image.clone()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.text
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_form(self) -> Result<Form, CatalogError> {
        let mut form = Form::new();
        for (name, value) in self.text {
            form = form.text(name, value);
        }
        if let Some((name, image)) = self.file {
            let part = Part::bytes(image.bytes.to_vec())
                .file_name(image.file_name)
                .mime_str(image.mime)?;
            form = form.part(name, part);
        }
        Ok(form)
    }
}

/// The four collection operations a panel needs.
pub trait Collection<R: Resource>: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<R::Entity>, CatalogError>> + Send;
    fn create(
        &self,
        fields: &R::Fields,
    ) -> impl Future<Output = Result<R::Entity, CatalogError>> + Send;
    fn update(
        &self,
        id: R::Id,
        fields: &R::Fields,
    ) -> impl Future<Output = Result<R::Entity, CatalogError>> + Send;
    fn delete(&self, id: R::Id) -> impl Future<Output = Result<(), CatalogError>> + Send;
}

/// HTTP implementation of [`Collection`] for one resource.
pub struct ResourceClient<R> {
    catalog: Catalog,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    pub(crate) fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            _resource: PhantomData,
        }
    }

    async fn submit(
        &self,
        method: Method,
        id: Option<R::Id>,
        fields: &R::Fields,
    ) -> Result<R::Entity, CatalogError> {
        let url = match id {
            Some(id) => self.catalog.item_url(R::PATH, id)?,
            None => self.catalog.collection_url(R::PATH)?,
        };

        let request = self.catalog.request(method, url);
        let request = match R::encode(fields) {
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(body) => {
                if let Some((_, image)) = &body.file {
                    tracing::debug!(kind = %R::KIND, file = %image.file_name, size = image.len(), "attaching image");
                }
                request.multipart(body.into_form()?)
            }
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!(kind = %R::KIND, %status, %body, "save rejected");
            return Err(CatalogError::rejected(status, body));
        }

        Ok(response.json().await?)
    }
}

impl<R: Resource> Collection<R> for ResourceClient<R> {
    async fn list(&self) -> Result<Vec<R::Entity>, CatalogError> {
        let url = self.catalog.collection_url(R::PATH)?;
        let items: Vec<R::Entity> = self.catalog.fetch(url).await?;
        tracing::debug!(kind = %R::KIND, count = items.len(), "listed collection");
        Ok(items)
    }

    async fn create(&self, fields: &R::Fields) -> Result<R::Entity, CatalogError> {
        let entity = self.submit(Method::POST, None, fields).await?;
        tracing::info!(kind = %R::KIND, id = %R::id(&entity), "created");
        Ok(entity)
    }

    async fn update(&self, id: R::Id, fields: &R::Fields) -> Result<R::Entity, CatalogError> {
        let entity = self.submit(Method::PUT, Some(id), fields).await?;
        tracing::info!(kind = %R::KIND, %id, "updated");
        Ok(entity)
    }

    async fn delete(&self, id: R::Id) -> Result<(), CatalogError> {
        let url = self.catalog.item_url(R::PATH, id)?;
        let response = self.catalog.request(Method::DELETE, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                body: response.text().await?,
            });
        }

        tracing::info!(kind = %R::KIND, %id, "deleted");
        Ok(())
    }
}
