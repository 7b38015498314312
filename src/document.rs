// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! The render-ready document model.
//!
//! [`build_document`] maps a parsed [`Collection`] onto a flat [`Document`]:
//! one [`DocumentEntry`] per item, in source order, with the URL flattened
//! and the body normalized.

use crate::normalize::{NormalizedBody, normalize_body};
use crate::parser::{Collection, Header, Item};
use log::trace;

/// Characters that cannot appear in output file names.
const INVALID_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// File stem used when a collection name sanitizes to nothing.
const FALLBACK_FILE_STEM: &str = "postman_collection";

/// A collection normalized for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The collection's display name.
    pub collection_name: String,

    /// One entry per collection item, in source order.
    pub entries: Vec<DocumentEntry>,
}

/// One documented request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// The item name.
    pub name: String,

    /// The HTTP method.
    pub method: String,

    /// The flattened URL.
    pub url: String,

    /// Request headers, copied verbatim.
    pub headers: Vec<Header>,

    /// The normalized body.
    pub body: NormalizedBody,

    /// The declared body mode, or `None` when the request has no body.
    pub body_mode: Option<String>,
}

impl DocumentEntry {
    fn from_item(item: &Item) -> Self {
        let request = &item.request;
        let entry = Self {
            name: item.name.clone(),
            method: request.method.clone(),
            url: request.url.flatten().to_owned(),
            headers: request.headers.clone(),
            body: request
                .body
                .as_ref()
                .map_or(NormalizedBody::Empty, normalize_body),
            body_mode: request.body.as_ref().map(|b| b.mode.clone()),
        };
        trace!(
            "built entry {:?} with {} field(s)",
            entry.name,
            entry.body.fields().len()
        );
        entry
    }
}

impl Document {
    /// Returns a file stem derived from the collection name.
    ///
    /// Path separators and other characters that are invalid in file names
    /// become underscores. A name that is blank after trimming falls back to
    /// `postman_collection`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let sanitized = self.collection_name.replace(INVALID_FILENAME_CHARS, "_");
        let trimmed = sanitized.trim();
        if trimmed.is_empty() {
            FALLBACK_FILE_STEM.to_owned()
        } else {
            trimmed.to_owned()
        }
    }
}

/// Builds a [`Document`] from a parsed collection.
///
/// The mapping is one-to-one and order-preserving: no item is dropped,
/// merged, or reordered.
#[must_use]
pub fn build_document(collection: &Collection) -> Document {
    Document {
        collection_name: collection.name.clone(),
        entries: collection.items.iter().map(DocumentEntry::from_item).collect(),
    }
}
