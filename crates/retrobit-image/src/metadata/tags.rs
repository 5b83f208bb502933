/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::collections::BTreeMap;

/// A flat map of tag names to values, ordered by name
pub type TagMap = BTreeMap<String, TagValue>;

/// The value of a single metadata tag
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TagValue {
    /// A plain string, e.g. PNG text or ASCII EXIF fields
    Scalar(String),
    /// A value with a human readable description
    Described {
        description: Option<String>,
        value:       Option<String>
    },
    /// A list of values
    Array(Vec<String>)
}

impl TagValue {
    /// Unwrap a tag into a single display string
    ///
    /// Prefers the description, then the value, then the joined array,
    /// then the scalar.
    ///
    /// ```
    /// use retrobit_image::metadata::TagValue;
    ///
    /// let tag = TagValue::Described {
    ///     description: Some("1/60 s".to_string()),
    ///     value:       Some("1/60".to_string())
    /// };
    /// assert_eq!(tag.display(), "1/60 s");
    ///
    /// let tag = TagValue::Array(vec!["a".to_string(), "b".to_string()]);
    /// assert_eq!(tag.display(), "a, b");
    /// ```
    pub fn display(&self) -> String {
        match self {
            Self::Described {
                description: Some(description),
                ..
            } => description.clone(),
            Self::Described {
                value: Some(value), ..
            } => value.clone(),
            Self::Described { .. } => String::new(),
            Self::Array(values) => values.join(", "),
            Self::Scalar(value) => value.clone()
        }
    }

    /// Return the text of a plain string tag
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None
        }
    }
}
