use catalog::{album::AlbumFields, artist::ArtistFields, image::Image, song::SongFields};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field `{field}` (expected one of: {expected})")]
    Unknown { field: String, expected: String },

    #[error("invalid value for `{field}`: {value}")]
    Invalid { field: &'static str, value: String },

    #[error("this form has no picture")]
    NoAttachment,
}

/// Draft fields that can be edited one named field at a time.
pub trait Editable {
    const FIELDS: &'static [&'static str];

    fn set(&mut self, field: &str, value: &str) -> Result<(), FieldError>;

    /// Current value of `field` as typed, empty when unset.
    fn get(&self, field: &str) -> Option<String>;

    fn image(&self) -> Option<&Image> {
        None
    }

    fn set_image(&mut self, _image: Image) -> Result<(), FieldError> {
        Err(FieldError::NoAttachment)
    }
}

fn unknown<T: Editable>(field: &str) -> FieldError {
    FieldError::Unknown {
        field: field.to_string(),
        expected: T::FIELDS.join(", "),
    }
}

fn parse_opt<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<Option<T>, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| FieldError::Invalid {
        field,
        value: value.to_string(),
    })
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Editable for ArtistFields {
    const FIELDS: &'static [&'static str] = &["name", "genre", "country"];

    fn set(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.to_string(),
            "genre" => self.genre = value.to_string(),
            "country" => self.country = value.to_string(),
            _ => return Err(unknown::<Self>(field)),
        }
        Ok(())
    }

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "genre" => Some(self.genre.clone()),
            "country" => Some(self.country.clone()),
            _ => None,
        }
    }

    fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    fn set_image(&mut self, image: Image) -> Result<(), FieldError> {
        self.image = Some(image);
        Ok(())
    }
}

impl Editable for AlbumFields {
    const FIELDS: &'static [&'static str] = &["title", "year", "artist"];

    fn set(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "year" => self.release_year = parse_opt("year", value)?,
            "artist" => self.artist = parse_opt("artist", value)?,
            _ => return Err(unknown::<Self>(field)),
        }
        Ok(())
    }

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "title" => Some(self.title.clone()),
            "year" => Some(display_opt(self.release_year)),
            "artist" => Some(display_opt(self.artist)),
            _ => None,
        }
    }

    fn image(&self) -> Option<&Image> {
        self.cover.as_ref()
    }

    fn set_image(&mut self, image: Image) -> Result<(), FieldError> {
        self.cover = Some(image);
        Ok(())
    }
}

impl Editable for SongFields {
    const FIELDS: &'static [&'static str] = &["title", "duration", "album"];

    fn set(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "duration" => self.duration = value.to_string(),
            "album" => self.album = parse_opt("album", value)?,
            _ => return Err(unknown::<Self>(field)),
        }
        Ok(())
    }

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "title" => Some(self.title.clone()),
            "duration" => Some(self.duration.clone()),
            "album" => Some(display_opt(self.album)),
            _ => None,
        }
    }
}
