// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Field typing, labelling, and description.
//!
//! Request bodies carry untyped JSON. This module assigns each value a
//! semantic [`ValueType`], turns identifiers like `user_id` or `userId` into
//! display labels, and combines both into a one-line field description.
//!
//! # Example
//!
//! ```
//! use apibook::fields::{describe_value, humanize, infer_type, ValueType};
//! use serde_json::json;
//!
//! assert_eq!(infer_type(&json!(30)), ValueType::Integer);
//! assert_eq!(humanize("userId"), "User id");
//! assert_eq!(describe_value("email", &json!("a@b.com")), "Email (example: a@b.com)");
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The semantic type of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// JSON `null`.
    Null,
    /// A JSON string.
    String,
    /// A whole number written without a fraction or exponent.
    Integer,
    /// Any other finite number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// A value that fits none of the other tags.
    Unknown,
}

impl ValueType {
    /// Returns the lowercase tag name used in rendered documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infers the semantic type of a decoded JSON value.
///
/// Total over every JSON value. Numbers that parsed as signed or unsigned
/// integers are `Integer`; numbers that needed a float (a fraction or an
/// exponent, or too large for 64 bits) are `Number`.
#[must_use]
pub fn infer_type(value: &Value) -> ValueType {
    match value {
        Value::Null => ValueType::Null,
        Value::Number(n) if n.is_i64() || n.is_u64() => ValueType::Integer,
        Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => ValueType::Number,
        Value::Number(_) => ValueType::Unknown,
        Value::String(_) => ValueType::String,
        Value::Bool(_) => ValueType::Boolean,
        Value::Array(_) => ValueType::Array,
        Value::Object(_) => ValueType::Object,
    }
}

/// Converts a raw field identifier into a display label.
///
/// Underscores become spaces and camelCase words are split apart, then the
/// first character is uppercased. A word split off a camelCase compound is
/// lowercased (`userId` → `User id`), while runs of capitals stay together
/// as acronyms (`ID` → `ID`, `userID` → `User ID`). ASCII rules only.
#[must_use]
pub fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.replace('_', " ").chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let word_start = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);

            if word_start {
                out.push(' ');
                if next_is_lower {
                    out.push(c.to_ascii_lowercase());
                    continue;
                }
            }
        }
        out.push(c);
    }

    capitalize_first(&out)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = String::with_capacity(s.len());
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
        out
    })
}

/// Builds a one-line description for a field of the given type.
///
/// `sample` is only consulted for strings: a non-empty sample is appended as
/// an example.
#[must_use]
pub fn describe(name: &str, value_type: ValueType, sample: Option<&str>) -> String {
    let label = humanize(name);

    match value_type {
        ValueType::String => match sample {
            Some(sample) if !sample.is_empty() => format!("{label} (example: {sample})"),
            _ => label,
        },
        ValueType::Integer | ValueType::Number => format!("{label} value"),
        ValueType::Boolean => format!("{label} flag"),
        ValueType::Array => format!("List of {label}"),
        ValueType::Object => format!("{label} object details"),
        ValueType::Null | ValueType::Unknown => label,
    }
}

/// Infers the type of `value` and describes a field holding it.
#[must_use]
pub fn describe_value(name: &str, value: &Value) -> String {
    describe(name, infer_type(value), value.as_str())
}
