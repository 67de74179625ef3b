//! # Movie Records
//!
//! Request payload parsing and the stored shape of a movie.
//!
//! Presence is explicit: an absent or `null` field is missing, a rating of
//! `0` is a rating. Title and genre must be non-empty strings on create;
//! on update an empty string or blank rating leaves the field unchanged.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::codec::{decode_number, decode_numeric_str, Attribute, CodecError, Item};
use crate::store::{UpdateExpression, KEY_ATTRIBUTE};

use super::errors::{MovieError, MovieResult};

pub const TITLE: &str = "title";
pub const GENRE: &str = "genre";
pub const RATING: &str = "rating";
pub const USERNAME: &str = "username";

const REQUIRED_MESSAGE: &str = "Title, Genre, and Rating are required";

/// Parsed JSON object body
#[derive(Debug, Clone, Default)]
pub struct MoviePayload {
    fields: Map<String, Value>,
}

impl MoviePayload {
    /// Parse a request body. A missing body, invalid JSON, or a non-object
    /// are all malformed.
    pub fn parse(body: Option<&str>) -> MovieResult<Self> {
        let body = body.ok_or_else(|| MovieError::MalformedBody("body is required".to_string()))?;
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(_) => Err(MovieError::MalformedBody(
                "body must be a JSON object".to_string(),
            )),
            Err(e) => Err(MovieError::MalformedBody(e.to_string())),
        }
    }

    /// Field value, with `null` treated as absent
    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// Present string field. Non-strings are a validation error.
    pub fn text(&self, name: &str) -> MovieResult<Option<&str>> {
        match self.field(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(MovieError::validation(format!("{} must be a string", name))),
        }
    }

    /// Non-empty `movieId`
    pub fn movie_id(&self) -> MovieResult<Option<&str>> {
        Ok(self.text(KEY_ATTRIBUTE)?.filter(|id| !id.is_empty()))
    }

    /// Rating as an exact decimal. Accepts a JSON number or numeric text.
    pub fn rating(&self) -> MovieResult<Option<Decimal>> {
        let parsed = match self.field(RATING) {
            None => return Ok(None),
            Some(Value::Number(n)) => decode_number(n),
            Some(Value::String(s)) => decode_numeric_str(s),
            Some(_) => return Err(MovieError::validation("Rating must be a number")),
        };

        parsed.map(Some).map_err(|e| match e {
            CodecError::NumberOutOfRange(_) => MovieError::validation("Rating is out of range"),
            _ => MovieError::validation("Rating must be a number"),
        })
    }

    fn has_blank_text(&self, name: &str) -> bool {
        matches!(self.field(name), Some(Value::String(s)) if s.trim().is_empty())
    }
}

/// Validated create request
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    pub rating: Decimal,
}

impl NewMovie {
    pub fn from_payload(payload: &MoviePayload) -> MovieResult<Self> {
        let title = payload.text(TITLE)?.filter(|s| !s.is_empty());
        let genre = payload.text(GENRE)?.filter(|s| !s.is_empty());
        let rating = if payload.has_blank_text(RATING) {
            None
        } else {
            payload.rating()?
        };

        match (title, genre, rating) {
            (Some(title), Some(genre), Some(rating)) => Ok(Self {
                title: title.to_string(),
                genre: genre.to_string(),
                rating,
            }),
            _ => Err(MovieError::validation(REQUIRED_MESSAGE)),
        }
    }
}

/// A fully populated movie record
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub movie_id: String,
    pub title: String,
    pub genre: String,
    pub rating: Decimal,
    /// Unauthenticated display name of the creator
    pub username: Option<String>,
}

impl Movie {
    /// Assign a fresh identifier to a validated create request
    pub fn create(new: NewMovie, username: Option<String>) -> Self {
        Self {
            movie_id: Uuid::new_v4().to_string(),
            title: new.title,
            genre: new.genre,
            rating: new.rating,
            username,
        }
    }

    pub fn into_item(self) -> Item {
        let mut item = Item::new();
        item.insert(KEY_ATTRIBUTE.to_string(), Attribute::String(self.movie_id));
        item.insert(TITLE.to_string(), Attribute::String(self.title));
        item.insert(GENRE.to_string(), Attribute::String(self.genre));
        item.insert(RATING.to_string(), Attribute::Number(self.rating));
        if let Some(username) = self.username {
            item.insert(USERNAME.to_string(), Attribute::String(username));
        }
        item
    }
}

/// Validated update request: the key plus whichever fields were supplied
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePatch {
    pub movie_id: String,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<Decimal>,
}

impl MoviePatch {
    pub fn from_payload(payload: &MoviePayload) -> MovieResult<Self> {
        let movie_id = payload
            .movie_id()?
            .ok_or_else(|| MovieError::validation("movieId is required"))?
            .to_string();

        let title = payload.text(TITLE)?.filter(|s| !s.is_empty());
        let genre = payload.text(GENRE)?.filter(|s| !s.is_empty());
        let rating = if payload.has_blank_text(RATING) {
            None
        } else {
            payload.rating()?
        };

        Ok(Self {
            movie_id,
            title: title.map(str::to_string),
            genre: genre.map(str::to_string),
            rating,
        })
    }

    /// No field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.genre.is_none() && self.rating.is_none()
    }

    /// `SET` expression over the supplied fields only
    pub fn to_update_expression(&self) -> UpdateExpression {
        let mut update = UpdateExpression::new();
        if let Some(title) = &self.title {
            update.set(TITLE, ":t", Attribute::from(title.as_str()));
        }
        if let Some(genre) = &self.genre {
            update.set(GENRE, ":g", Attribute::from(genre.as_str()));
        }
        if let Some(rating) = self.rating {
            update.set(RATING, ":r", Attribute::Number(rating));
        }
        update
    }
}
