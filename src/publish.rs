// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Wiki page payloads.
//!
//! A rendered document is published by posting a page-creation payload to
//! the wiki's content API. This module builds that payload. Sending the
//! request is left to the caller's HTTP client.
//!
//! # Example
//!
//! ```
//! use apibook::publish::{page_payload, PageTarget};
//!
//! let target = PageTarget {
//!     title: "Demo API".into(),
//!     parent_id: Some("12345".into()),
//!     space_key: "DOCS".into(),
//! };
//!
//! let payload = page_payload(&target, "<h1>Demo</h1>");
//! let json = serde_json::to_value(&payload).unwrap();
//! assert_eq!(json["space"]["key"], "DOCS");
//! assert_eq!(json["body"]["storage"]["representation"], "storage");
//! ```

use serde::Serialize;

/// Where a rendered document should be published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTarget {
    /// The page title.
    pub title: String,
    /// The id of the page to nest the new page under, if any.
    pub parent_id: Option<String>,
    /// The key of the wiki space to create the page in.
    pub space_key: String,
}

/// A page-creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePayload {
    /// Content type; always `page`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// The page title.
    pub title: String,
    /// Parent pages. Empty when the page is created at the space root.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<Ancestor>,
    /// The target space.
    pub space: Space,
    /// The page content.
    pub body: PageBody,
}

/// A reference to a parent page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ancestor {
    /// The parent page id.
    pub id: String,
}

/// A reference to a wiki space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Space {
    /// The space key.
    pub key: String,
}

/// Wrapper around the page's storage-format content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageBody {
    /// The storage-format representation.
    pub storage: Storage,
}

/// Page content in a named representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Storage {
    /// The rendered markup.
    pub value: String,
    /// Representation name; always `storage`.
    pub representation: &'static str,
}

/// Builds the page-creation payload for a rendered document body.
#[must_use]
pub fn page_payload(target: &PageTarget, body: &str) -> PagePayload {
    PagePayload {
        kind: "page",
        title: target.title.clone(),
        ancestors: target
            .parent_id
            .iter()
            .map(|id| Ancestor { id: id.clone() })
            .collect(),
        space: Space {
            key: target.space_key.clone(),
        },
        body: PageBody {
            storage: Storage {
                value: body.to_owned(),
                representation: "storage",
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_target(parent_id: Option<&str>) -> PageTarget {
        PageTarget {
            title: "Demo API".into(),
            parent_id: parent_id.map(str::to_owned),
            space_key: "DOCS".into(),
        }
    }

    #[test]
    fn serializes_full_payload() {
        let payload = page_payload(&make_target(Some("42")), "<h1>Demo</h1>");

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "type": "page",
                "title": "Demo API",
                "ancestors": [{ "id": "42" }],
                "space": { "key": "DOCS" },
                "body": {
                    "storage": {
                        "value": "<h1>Demo</h1>",
                        "representation": "storage"
                    }
                }
            })
        );
    }

    #[test]
    fn omits_ancestors_without_parent() {
        let payload = page_payload(&make_target(None), "");
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("ancestors").is_none());
        assert_eq!(json["type"], "page");
    }

    #[test]
    fn keeps_body_text_verbatim() {
        let body = "<p>\"quoted\" \\ \n line</p>";
        let payload = page_payload(&make_target(None), body);

        assert_eq!(payload.body.storage.value, body);
        let round_trip: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(round_trip["body"]["storage"]["value"], body);
    }
}
