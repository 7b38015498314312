// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Request body normalization.
//!
//! Bodies arrive in several encodings. This module flattens each one into a
//! numbered list of typed, described fields, or keeps the raw text when no
//! fields can be extracted.
//!
//! # Example
//!
//! ```
//! use apibook::normalize::{normalize_body, NormalizedBody};
//! use apibook::parser::Body;
//!
//! let body = Body {
//!     mode: "raw".into(),
//!     raw: Some("not json".into()),
//!     ..Default::default()
//! };
//!
//! assert_eq!(normalize_body(&body), NormalizedBody::Raw("not json".into()));
//! ```

use crate::fields::{ValueType, describe_value, humanize, infer_type};
use crate::parser::{Body, FormEntry};
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

/// The declared encoding of a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyMode {
    /// Raw text, usually JSON.
    Raw,
    /// Multipart form entries.
    FormData,
    /// URL-encoded form entries.
    UrlEncoded,
    /// Any other mode, carried through verbatim.
    Other(String),
}

impl BodyMode {
    /// Returns the mode's name as written in the export.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Raw => "raw",
            Self::FormData => "formdata",
            Self::UrlEncoded => "urlencoded",
            Self::Other(mode) => mode.as_str(),
        }
    }
}

impl From<&str> for BodyMode {
    fn from(mode: &str) -> Self {
        match mode {
            "raw" => Self::Raw,
            "formdata" => Self::FormData,
            "urlencoded" => Self::UrlEncoded,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// One typed, described, numbered field extracted from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedField {
    /// 1-based position within the owning body.
    pub number: usize,

    /// The field name as it appears in the body.
    pub field: String,

    /// The inferred semantic type.
    #[serde(rename = "type")]
    pub value_type: ValueType,

    /// Whether the field is required. Exports carry no such signal, so this
    /// is always `false`.
    pub mandatory: bool,

    /// Generated one-line description.
    pub description: String,
}

/// The documentation form of one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NormalizedBody {
    /// A non-empty list of extracted fields.
    Fields(Vec<NormalizedField>),
    /// The body text, kept verbatim because no fields could be extracted.
    Raw(String),
    /// Nothing to show.
    #[default]
    Empty,
}

impl NormalizedBody {
    /// Returns the extracted fields, or an empty slice.
    #[must_use]
    pub fn fields(&self) -> &[NormalizedField] {
        match self {
            Self::Fields(fields) => fields.as_slice(),
            Self::Raw(_) | Self::Empty => &[],
        }
    }

    /// Returns the raw fallback text, or the empty string.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Raw(raw) => raw.as_str(),
            Self::Fields(_) | Self::Empty => "",
        }
    }
}

/// Normalizes a request body according to its declared mode.
///
/// - `raw` with text: the text is decoded as a JSON object and each member
///   becomes a field. Text that isn't an object, or an empty object, is
///   kept verbatim instead.
/// - `formdata` / `urlencoded` with entries: one field per entry, in
///   declared order, described by the humanized key alone.
/// - Anything else: the raw text if there is any, otherwise nothing.
#[must_use]
pub fn normalize_body(body: &Body) -> NormalizedBody {
    let raw = body.raw_text();
    let form_data = body.form_data.as_deref().unwrap_or_default();
    let url_encoded = body.url_encoded.as_deref().unwrap_or_default();

    match BodyMode::from(body.mode.as_str()) {
        BodyMode::Raw if !raw.is_empty() => {
            let fields = raw_json_fields(raw);
            if fields.is_empty() {
                debug!("raw body is not a non-empty JSON object, keeping text");
                NormalizedBody::Raw(raw.to_owned())
            } else {
                NormalizedBody::Fields(fields)
            }
        }
        BodyMode::FormData if !form_data.is_empty() => {
            NormalizedBody::Fields(form_fields(form_data))
        }
        BodyMode::UrlEncoded if !url_encoded.is_empty() => {
            NormalizedBody::Fields(form_fields(url_encoded))
        }
        _ if !raw.is_empty() => NormalizedBody::Raw(raw.to_owned()),
        _ => NormalizedBody::Empty,
    }
}

/// Extracts one field per member of a raw JSON object body.
///
/// Returns an empty list when the text does not decode to an object. Field
/// order follows the decoded map's iteration order.
#[must_use]
pub fn raw_json_fields(raw: &str) -> Vec<NormalizedField> {
    let Ok(members) = serde_json::from_str::<Map<String, Value>>(raw) else {
        return Vec::new();
    };

    members
        .iter()
        .enumerate()
        .map(|(i, (key, value))| NormalizedField {
            number: i + 1,
            field: key.clone(),
            value_type: infer_type(value),
            mandatory: false,
            description: describe_value(key, value),
        })
        .collect()
}

/// Builds one field per form entry, in declared order.
#[must_use]
pub fn form_fields(entries: &[FormEntry]) -> Vec<NormalizedField> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| NormalizedField {
            number: i + 1,
            field: entry.key.clone(),
            value_type: infer_type(&entry.value),
            mandatory: false,
            description: humanize(&entry.key),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_body(raw: &str) -> Body {
        Body {
            mode: "raw".into(),
            raw: Some(raw.into()),
            ..Default::default()
        }
    }

    fn entry(key: &str, value: Value) -> FormEntry {
        FormEntry {
            key: key.into(),
            value,
            kind: "text".into(),
        }
    }

    fn assert_dense(fields: &[NormalizedField]) {
        let mut numbers: Vec<_> = fields.iter().map(|f| f.number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=fields.len()).collect::<Vec<_>>());
    }

    #[test]
    fn extracts_fields_from_raw_json() {
        let normalized = normalize_body(&raw_body(r#"{"name":"Jane","age":30}"#));

        let fields = match &normalized {
            NormalizedBody::Fields(fields) => fields,
            other => panic!("Expected Fields, got {other:?}"),
        };
        assert_eq!(fields.len(), 2);
        assert_dense(fields);
        assert_eq!(normalized.raw(), "");

        let name = fields.iter().find(|f| f.field == "name").unwrap();
        assert_eq!(name.value_type, ValueType::String);
        assert_eq!(name.description, "Name (example: Jane)");
        assert!(!name.mandatory);

        let age = fields.iter().find(|f| f.field == "age").unwrap();
        assert_eq!(age.value_type, ValueType::Integer);
        assert_eq!(age.description, "Age value");
    }

    #[test]
    fn falls_back_to_raw_for_undecodable_text() {
        let normalized = normalize_body(&raw_body("not json"));

        assert_eq!(normalized, NormalizedBody::Raw("not json".into()));
        assert!(normalized.fields().is_empty());
    }

    #[test]
    fn falls_back_to_raw_for_empty_object() {
        assert_eq!(
            normalize_body(&raw_body("{}")),
            NormalizedBody::Raw("{}".into())
        );
    }

    #[test]
    fn falls_back_to_raw_for_non_object_json() {
        assert_eq!(
            normalize_body(&raw_body("[1, 2, 3]")),
            NormalizedBody::Raw("[1, 2, 3]".into())
        );
        assert_eq!(
            normalize_body(&raw_body("null")),
            NormalizedBody::Raw("null".into())
        );
    }

    #[test]
    fn raw_mode_without_text_is_empty() {
        assert_eq!(normalize_body(&raw_body("")), NormalizedBody::Empty);

        let body = Body {
            mode: "raw".into(),
            ..Default::default()
        };
        assert_eq!(normalize_body(&body), NormalizedBody::Empty);
    }

    #[test]
    fn extracts_form_data_fields() {
        let body = Body {
            mode: "formdata".into(),
            form_data: Some(vec![entry("file", json!("a.png"))]),
            ..Default::default()
        };

        let normalized = normalize_body(&body);
        let fields = normalized.fields();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].number, 1);
        assert_eq!(fields[0].field, "file");
        assert_eq!(fields[0].value_type, ValueType::String);
        assert!(!fields[0].mandatory);
        assert_eq!(fields[0].description, "File");
    }

    #[test]
    fn form_fields_keep_declared_order_without_examples() {
        let body = Body {
            mode: "urlencoded".into(),
            url_encoded: Some(vec![
                entry("grant_type", json!("password")),
                entry("userName", json!("jane")),
                entry("remember_me", json!(true)),
            ]),
            ..Default::default()
        };

        let normalized = normalize_body(&body);
        let fields = normalized.fields();

        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, ["grant_type", "userName", "remember_me"]);
        let numbers: Vec<_> = fields.iter().map(|f| f.number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(fields[0].description, "Grant type");
        assert_eq!(fields[1].description, "User name");
        assert_eq!(fields[2].value_type, ValueType::Boolean);
        assert_eq!(fields[2].description, "Remember me");
    }

    #[test]
    fn empty_form_data_falls_back_to_raw_text() {
        let body = Body {
            mode: "formdata".into(),
            raw: Some("leftover".into()),
            form_data: Some(Vec::new()),
            ..Default::default()
        };

        assert_eq!(normalize_body(&body), NormalizedBody::Raw("leftover".into()));
    }

    #[test]
    fn form_mode_ignores_entries_of_other_mode() {
        let body = Body {
            mode: "formdata".into(),
            url_encoded: Some(vec![entry("a", json!("1"))]),
            ..Default::default()
        };

        assert_eq!(normalize_body(&body), NormalizedBody::Empty);
    }

    #[test]
    fn other_modes_keep_raw_text() {
        let body = Body {
            mode: "graphql".into(),
            raw: Some("{ users { id } }".into()),
            ..Default::default()
        };

        assert_eq!(
            normalize_body(&body),
            NormalizedBody::Raw("{ users { id } }".into())
        );
    }

    #[test]
    fn other_modes_without_text_are_empty() {
        let body = Body {
            mode: "file".into(),
            ..Default::default()
        };

        assert_eq!(normalize_body(&body), NormalizedBody::Empty);
    }

    #[test]
    fn body_mode_round_trips_names() {
        for name in ["raw", "formdata", "urlencoded", "graphql"] {
            assert_eq!(BodyMode::from(name).as_str(), name);
        }
        assert_eq!(BodyMode::from("raw"), BodyMode::Raw);
        assert_eq!(BodyMode::from("binary"), BodyMode::Other("binary".into()));
    }

    #[test]
    fn raw_json_fields_describe_nested_values() {
        let fields = raw_json_fields(r#"{"tags":["a"],"address":{"city":"X"},"note":null}"#);

        assert_eq!(fields.len(), 3);
        assert_dense(&fields);
        let by_name = |name: &str| fields.iter().find(|f| f.field == name).unwrap();
        assert_eq!(by_name("tags").description, "List of Tags");
        assert_eq!(by_name("address").description, "Address object details");
        assert_eq!(by_name("note").value_type, ValueType::Null);
        assert_eq!(by_name("note").description, "Note");
    }
}
