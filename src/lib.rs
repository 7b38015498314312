// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert API collection exports to wiki-ready documentation.
//!
//! This crate turns a collection export (a JSON description of named HTTP
//! requests, as produced by Postman and similar clients) into a structured
//! document and renders it through a template, ready to be published as a
//! wiki page.
//!
//! # Overview
//!
//! The pipeline runs in one direction:
//!
//! 1. Parse the export bytes into a typed [`parser::Collection`]
//! 2. Normalize each request body into typed, described fields
//! 3. Assemble a flat [`document::Document`]
//! 4. Render the document through a template
//!
//! Every stage works on in-memory data and keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use apibook::renderer::{RenderOptions, DEFAULT_TEMPLATE};
//!
//! let json = br#"{
//!     "info": { "name": "Demo" },
//!     "item": [{ "name": "Ping", "request": { "method": "GET", "url": "/ping" } }]
//! }"#;
//!
//! let html = apibook::convert(json, DEFAULT_TEMPLATE, &RenderOptions::default()).unwrap();
//! assert!(html.contains("Demo"));
//! assert!(html.contains("GET"));
//! assert!(html.contains("/ping"));
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing and type definitions for collection exports
//! - [`fields`]: Type inference, label humanizing, and field descriptions
//! - [`normalize`]: Request body normalization
//! - [`document`]: The render-ready document model
//! - [`renderer`]: Template rendering with configurable output options
//! - [`publish`]: Wiki page-creation payloads

#![deny(missing_docs)]

pub mod document;
pub mod fields;
pub mod normalize;
pub mod parser;
pub mod publish;
pub mod renderer;

use snafu::prelude::*;

/// Error type for the conversion pipeline.
#[derive(Debug, Snafu)]
pub enum ConvertError {
    /// The input could not be parsed as a collection.
    #[snafu(display("failed to parse collection: {source}"))]
    Parse {
        /// The underlying parse error.
        source: parser::ParseError,
    },
}

/// Converts collection export bytes into a rendered document.
///
/// Template failures do not fail the conversion; the output then carries a
/// diagnostic instead (see [`renderer::render_document`]).
///
/// # Errors
///
/// Returns an error if the bytes are not a valid collection export. No
/// partial document is produced in that case.
pub fn convert(
    bytes: &[u8],
    template: &str,
    opts: &renderer::RenderOptions,
) -> Result<String, ConvertError> {
    let collection = parser::parse_collection(bytes).context(ParseSnafu)?;
    let document = document::build_document(&collection);
    Ok(renderer::render_document(&document, template, opts))
}
