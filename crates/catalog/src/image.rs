use std::path::Path;

use bytes::Bytes;

use crate::CatalogError;

/// Picture attached to an artist or album draft.
///
/// `Remote` is something the server already stores and is never uploaded again;
/// `Local` is a file picked on this machine and is sent with the next save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    Remote(String),
    Local(LocalImage),
}

impl Image {
    pub fn is_local(&self) -> bool {
        matches!(self, Image::Local(_))
    }

    pub fn as_local(&self) -> Option<&LocalImage> {
        match self {
            Image::Local(local) => Some(local),
            Image::Remote(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Bytes,
}

impl LocalImage {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            mime: mime_for(&file_name),
            file_name,
            bytes: bytes.into(),
        }
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!(file = %path.display(), size = bytes.len(), "read local image");
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
