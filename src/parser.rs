// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for API collection exports.
//!
//! This module handles deserialization of the collection format produced by
//! API clients such as Postman. A collection is a named list of items, each
//! describing one HTTP request.
//!
//! # Format Overview
//!
//! A collection export contains:
//! - An `info` block with the collection name
//! - An `item` list of named requests
//! - Each request carries a method, headers, a URL (plain or structured),
//!   and an optional body in one of several encodings
//!
//! Folders (items that nest further items) are not expanded; such an item
//! parses with an empty request.
//!
//! # Example
//!
//! ```
//! use apibook::parser::parse_collection;
//!
//! let json = br#"{
//!     "info": { "name": "Demo" },
//!     "item": [{
//!         "name": "Ping",
//!         "request": { "method": "GET", "url": "/ping" }
//!     }]
//! }"#;
//!
//! let collection = parse_collection(json).unwrap();
//! assert_eq!(collection.name, "Demo");
//! assert_eq!(collection.items.len(), 1);
//! ```

use serde::Deserialize;
use serde_json::Value;
use snafu::prelude::*;

/// Error type for collection parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// The input is not valid JSON or does not match the collection shape.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// The root structure of a collection export.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// The display name of the collection.
    pub name: String,

    /// The requests in the collection, in display order.
    pub items: Vec<Item>,
}

/// One named request definition within a collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    /// The item's display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// The request itself. Empty for folder items.
    #[serde(default, deserialize_with = "null_as_default")]
    pub request: Request,
}

/// An HTTP request definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Request {
    /// The HTTP method (e.g., "GET").
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    /// Request headers, in declared order.
    #[serde(default, rename = "header", deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,

    /// The request URL.
    #[serde(default)]
    pub url: RequestUrl,

    /// The request body, if one is declared.
    #[serde(default)]
    pub body: Option<Body>,
}

/// A single request header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Header {
    /// Header name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,

    /// Header value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,

    /// Display hint from the export (e.g., "text"). Not interpreted.
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

/// A request URL as it appears in the export.
///
/// Exports store URLs either as a plain string or as an object that breaks
/// the URL into parts alongside the original `raw` text. Only the `raw`
/// text of a structured URL is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestUrl {
    /// A plain URL string.
    Text(String),

    /// A structured URL object.
    Structured {
        /// The original URL text, if present.
        raw: Option<String>,
    },

    /// No URL, or a value of an unrecognized shape.
    #[default]
    Missing,
}

impl RequestUrl {
    /// Flattens the URL to a single string.
    ///
    /// Plain strings are returned verbatim and structured URLs yield their
    /// `raw` text. Anything else flattens to the empty string.
    #[must_use]
    pub fn flatten(&self) -> &str {
        match self {
            Self::Text(url) => url.as_str(),
            Self::Structured { raw: Some(raw) } => raw.as_str(),
            Self::Structured { raw: None } | Self::Missing => "",
        }
    }
}

impl<'de> Deserialize<'de> for RequestUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        Ok(match value {
            Value::String(url) => Self::Text(url),
            Value::Object(url) => Self::Structured {
                raw: url.get("raw").and_then(Value::as_str).map(str::to_owned),
            },
            _ => Self::Missing,
        })
    }
}

/// A request body together with its declared encoding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Body {
    /// The declared body mode (e.g., "raw", "formdata", "urlencoded").
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: String,

    /// Raw body text.
    #[serde(default)]
    pub raw: Option<String>,

    /// Multipart form entries.
    #[serde(default, rename = "formdata")]
    pub form_data: Option<Vec<FormEntry>>,

    /// URL-encoded form entries.
    #[serde(default, rename = "urlencoded")]
    pub url_encoded: Option<Vec<FormEntry>>,
}

impl Body {
    /// Returns the raw body text, or the empty string when none is set.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        self.raw.as_deref().unwrap_or_default()
    }
}

/// A single key/value entry of a form or URL-encoded body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormEntry {
    /// Field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,

    /// Field value as decoded from the export.
    ///
    /// Usually a string. A missing or `null` value is stored as the empty
    /// string.
    #[serde(default = "empty_text", deserialize_with = "null_as_empty_text")]
    pub value: Value,

    /// Entry kind from the export (e.g., "text" or "file").
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

fn empty_text() -> Value {
    Value::String(String::new())
}

/// Deserializes an explicit `null` as the type's default.
///
/// Exports written by some tools emit `null` for unset text fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty_text<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_text))
}

#[derive(Deserialize)]
struct RawCollection {
    info: RawInfo,
    item: Vec<Item>,
}

#[derive(Deserialize)]
struct RawInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCollection::deserialize(deserializer)?;

        Ok(Self {
            name: raw.info.name,
            items: raw.item,
        })
    }
}

/// Parses raw export bytes into a [`Collection`].
///
/// This is the main entry point for parsing collection exports.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or don't match the
/// expected collection shape (for example, a missing `info` or `item`).
pub fn parse_collection(bytes: &[u8]) -> Result<Collection, ParseError> {
    serde_json::from_slice(bytes).context(JsonSnafu)
}
