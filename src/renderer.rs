// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Template rendering for documents.
//!
//! This module binds a [`Document`] into a [`minijinja`] template. The
//! template sees the following variables:
//!
//! - `collection_name`
//! - `entries`, each with `name`, `method`, `url`, `headers`, `fields`,
//!   `has_fields`, `body` (raw fallback text), and `body_mode`
//! - per header: `key`, `value`, `kind`
//! - per field: `number`, `field`, `type`, `mandatory`, `description`
//!
//! Missing text values are bound as empty strings, so templates can test
//! them with a plain `{% if %}`.
//!
//! # Example
//!
//! ```
//! use apibook::document::Document;
//! use apibook::renderer::{render_document, RenderOptions};
//!
//! let document = Document {
//!     collection_name: "Demo".into(),
//!     entries: Vec::new(),
//! };
//!
//! let output = render_document(&document, "# {{ collection_name }}", &RenderOptions::default());
//! assert_eq!(output, "# Demo");
//! ```

use crate::document::{Document, DocumentEntry};
use crate::normalize::NormalizedField;
use crate::parser::Header;
use log::warn;
use minijinja::Environment;
use serde::Serialize;
use snafu::prelude::*;
use std::borrow::Cow;

/// The built-in template, producing wiki storage-format markup.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/api_book.html");

const TEMPLATE_NAME: &str = "document";

/// Error type for template failures.
#[derive(Debug, Snafu)]
pub enum TemplateError {
    /// The template source could not be compiled.
    #[snafu(display("invalid template: {source}"))]
    Compile {
        /// The underlying template engine error.
        source: minijinja::Error,
    },

    /// The template compiled but failed while rendering.
    #[snafu(display("failed to render template: {source}"))]
    Render {
        /// The underlying template engine error.
        source: minijinja::Error,
    },
}

/// Configuration options for document rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether to escape markup characters in bound values.
    ///
    /// When enabled, `&`, `<`, `>` and `"` in names, URLs, headers, field
    /// descriptions and raw bodies become entities. This suits the wiki
    /// storage format, which is XHTML.
    pub escape_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { escape_html: true }
    }
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    collection_name: Cow<'a, str>,
    entries: Vec<EntryContext<'a>>,
}

#[derive(Serialize)]
struct EntryContext<'a> {
    name: Cow<'a, str>,
    method: Cow<'a, str>,
    url: Cow<'a, str>,
    headers: Vec<HeaderContext<'a>>,
    fields: Vec<FieldContext<'a>>,
    has_fields: bool,
    body: Cow<'a, str>,
    body_mode: Cow<'a, str>,
}

#[derive(Serialize)]
struct HeaderContext<'a> {
    key: Cow<'a, str>,
    value: Cow<'a, str>,
    kind: Cow<'a, str>,
}

#[derive(Serialize)]
struct FieldContext<'a> {
    number: usize,
    field: Cow<'a, str>,
    #[serde(rename = "type")]
    value_type: &'static str,
    mandatory: bool,
    description: Cow<'a, str>,
}

/// Binds values into the template context, escaping them when requested.
struct Binder {
    escape: bool,
}

impl Binder {
    fn text<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.escape {
            escape_markup(s)
        } else {
            Cow::Borrowed(s)
        }
    }

    fn document<'a>(&self, document: &'a Document) -> DocumentContext<'a> {
        DocumentContext {
            collection_name: self.text(&document.collection_name),
            entries: document.entries.iter().map(|e| self.entry(e)).collect(),
        }
    }

    fn entry<'a>(&self, entry: &'a DocumentEntry) -> EntryContext<'a> {
        let fields = entry.body.fields();
        EntryContext {
            name: self.text(&entry.name),
            method: self.text(&entry.method),
            url: self.text(&entry.url),
            headers: entry.headers.iter().map(|h| self.header(h)).collect(),
            fields: fields.iter().map(|f| self.field(f)).collect(),
            has_fields: !fields.is_empty(),
            body: self.text(entry.body.raw()),
            body_mode: self.text(entry.body_mode.as_deref().unwrap_or_default()),
        }
    }

    fn header<'a>(&self, header: &'a Header) -> HeaderContext<'a> {
        HeaderContext {
            key: self.text(&header.key),
            value: self.text(&header.value),
            kind: self.text(&header.kind),
        }
    }

    fn field<'a>(&self, field: &'a NormalizedField) -> FieldContext<'a> {
        FieldContext {
            number: field.number,
            field: self.text(&field.field),
            value_type: field.value_type.as_str(),
            mandatory: field.mandatory,
            description: self.text(&field.description),
        }
    }
}

/// Renders a document through the given template source.
///
/// # Errors
///
/// Returns [`TemplateError::Compile`] when the template has a syntax error
/// and [`TemplateError::Render`] when evaluation fails.
pub fn try_render_document(
    document: &Document,
    template: &str,
    opts: &RenderOptions,
) -> Result<String, TemplateError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(TEMPLATE_NAME, template)
        .context(CompileSnafu)?;
    let tmpl = env.get_template(TEMPLATE_NAME).context(CompileSnafu)?;

    let binder = Binder {
        escape: opts.escape_html,
    };
    tmpl.render(binder.document(document)).context(RenderSnafu)
}

/// Renders a document, substituting a diagnostic on template failure.
///
/// Template problems never abort the pipeline: the returned text is then
/// `Template execution error: <reason>`.
#[must_use]
pub fn render_document(document: &Document, template: &str, opts: &RenderOptions) -> String {
    try_render_document(document, template, opts).unwrap_or_else(|err| {
        warn!("template failed for {:?}: {err}", document.collection_name);
        format!("Template execution error: {err}")
    })
}

/// Escapes markup-significant characters as entities.
///
/// Borrows the input unchanged when nothing needs escaping.
fn escape_markup(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
