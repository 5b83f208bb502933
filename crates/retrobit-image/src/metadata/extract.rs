/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use retrobit_core::log::{debug, info};

use crate::codecs::ImageFormat;
use crate::metadata::parameters::parse_generation_parameters;
use crate::metadata::readers::{CombinedTagReader, TagReader};
use crate::metadata::tags::TagMap;
use crate::metadata::Metadata;

/// Well known photographic tags kept in the EXIF bucket
const EXIF_ALLOW_LIST: [&str; 15] = [
    "Make",
    "Model",
    "DateTime",
    "DateTimeOriginal",
    "ExposureTime",
    "FNumber",
    "ISOSpeedRatings",
    // what kamadak-exif calls ISOSpeedRatings
    "PhotographicSensitivity",
    "FocalLength",
    "LensModel",
    "Software",
    "Artist",
    "Copyright",
    "ImageDescription",
    "UserComment"
];

const PNG_TEXT_MARKERS: [&str; 3] = ["png-", "text", "comment"];

const AI_MARKERS: [&str; 7] = [
    "parameters",
    "prompt",
    "steps",
    "sampler",
    "cfg",
    "seed",
    "model"
];

/// Details about the source file that don't come from its bytes
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileInfo {
    pub name:          String,
    pub size:          u64,
    /// Milliseconds since the unix epoch
    pub last_modified: Option<u64>,
    /// Overrides the MIME type derived from the detected format
    pub mime_type:     Option<String>
}

impl FileInfo {
    pub fn new(name: &str, size: u64) -> FileInfo {
        FileInfo {
            name: name.to_string(),
            size,
            ..Default::default()
        }
    }
}

/// Extracted metadata and every problem met while extracting it
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataReport {
    pub metadata: Metadata,
    pub warnings: Vec<String>
}

/// Extract metadata from `bytes` using the default [`CombinedTagReader`]
///
/// This never fails, reader and parser problems are returned as warnings.
pub fn extract(bytes: &[u8], file_info: &FileInfo) -> MetadataReport {
    extract_with(&CombinedTagReader::default(), bytes, file_info)
}

/// Extract metadata from `bytes` using `reader`
///
/// Tags are sorted into three possibly overlapping buckets, by case
/// insensitive matching on the tag name
///
/// - `exif`: a fixed allow list of photographic tags
/// - `png`: names containing `png-`, `text` or `comment`
/// - `ai.raw`: names containing `parameters`, `prompt`, `steps`, `sampler`,
///   `cfg`, `seed` or `model`
///
/// Generation parameters are parsed from the first AI tag whose name contains
/// `parameters`, or failing that from an EXIF `UserComment` containing
/// `Steps:`.
pub fn extract_with(reader: &dyn TagReader, bytes: &[u8], file_info: &FileInfo) -> MetadataReport {
    let format = ImageFormat::guess_format(bytes);

    let mut metadata = Metadata::new(&file_info.name, file_info.size, format);
    metadata.last_modified = file_info.last_modified;

    if let Some(mime_type) = &file_info.mime_type {
        metadata.mime_type.clone_from(mime_type);
    }

    let (tags, errors) = reader.read_tags_lossy(bytes);

    let mut warnings: Vec<String> = errors
        .iter()
        .map(|x| x.to_string().trim_end().to_string())
        .collect();

    classify(&tags, &mut metadata);

    if let Some(text) = generation_parameters_text(&metadata) {
        let outcome = parse_generation_parameters(&text);

        warnings.extend(
            outcome
                .warnings
                .into_iter()
                .map(|x| format!("Generation parameters: {x}"))
        );
        metadata.ai.parsed_parameters = Some(outcome.params);
    }
    metadata.tags = tags;

    debug!(
        "Extracted {} tags, {} exif, {} png, {} ai",
        metadata.tags.len(),
        metadata.exif.len(),
        metadata.png.len(),
        metadata.ai.raw.len()
    );
    if !warnings.is_empty() {
        info!("Metadata extraction finished with {} warnings", warnings.len());
    }

    MetadataReport { metadata, warnings }
}

fn classify(tags: &TagMap, metadata: &mut Metadata) {
    for (key, value) in tags {
        let lowered = key.to_lowercase();

        if EXIF_ALLOW_LIST.iter().any(|x| x.eq_ignore_ascii_case(key)) {
            metadata.exif.insert(key.clone(), value.clone());
        }
        if PNG_TEXT_MARKERS.iter().any(|x| lowered.contains(x)) {
            metadata.png.insert(key.clone(), value.clone());
        }
        if AI_MARKERS.iter().any(|x| lowered.contains(x)) {
            metadata.ai.raw.insert(key.clone(), value.clone());
        }
    }
}

fn generation_parameters_text(metadata: &Metadata) -> Option<String> {
    let parameters = metadata
        .ai
        .raw
        .iter()
        .find(|(key, _)| key.to_lowercase().contains("parameters"))
        .map(|(_, value)| value.display());

    parameters.or_else(|| {
        metadata
            .exif
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("UserComment"))
            .map(|(_, value)| value.display())
            .filter(|x| x.contains("Steps:"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataError, TagValue};

    struct FixedTags(Vec<(&'static str, TagValue)>);

    impl TagReader for FixedTags {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn read_tags(&self, _: &[u8]) -> Result<TagMap, MetadataError> {
            Ok(self
                .0
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect())
        }
    }

    struct Failing;

    impl TagReader for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn read_tags(&self, _: &[u8]) -> Result<TagMap, MetadataError> {
            Err(MetadataError::Exif("corrupt IFD".to_string()))
        }
    }

    fn scalar(value: &str) -> TagValue {
        TagValue::Scalar(value.to_string())
    }

    #[test]
    fn buckets_are_case_insensitive_and_overlap() {
        let reader = FixedTags(vec![
            ("make", scalar("Canon")),
            ("Model", scalar("EOS")),
            ("UserComment", scalar("hello")),
            ("png-Title", scalar("x")),
            ("Positive Prompt", scalar("a cat")),
            ("Unrelated", scalar("y")),
        ]);
        let report = extract_with(&reader, &[0xFF, 0xD8], &FileInfo::new("a.jpg", 2));
        let metadata = report.metadata;

        assert_eq!(metadata.format, ImageFormat::Jpeg);
        assert_eq!(metadata.mime_type, "image/jpeg");
        assert_eq!(metadata.tags.len(), 6);
        assert!(metadata.exif.contains_key("make"));
        // Model is both an EXIF tag and an AI marker
        assert!(metadata.exif.contains_key("Model"));
        assert!(metadata.ai.raw.contains_key("Model"));
        assert!(metadata.png.contains_key("UserComment"));
        assert!(metadata.png.contains_key("png-Title"));
        assert!(metadata.ai.raw.contains_key("Positive Prompt"));
        assert!(!metadata.exif.contains_key("Unrelated"));
        assert!(metadata.ai.parsed_parameters.is_none());
    }

    #[test]
    fn parameters_are_parsed() {
        let reader = FixedTags(vec![(
            "parameters",
            scalar("a cat\nSteps: 20, Sampler: Euler, Size: 64x32")
        )]);
        let report = extract_with(&reader, &[], &FileInfo::new("cat.png", 10));
        let params = report.metadata.ai.parsed_parameters.unwrap();

        assert_eq!(params.positive_prompt.as_deref(), Some("a cat"));
        assert_eq!(params.width, Some(64));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn user_comment_fallback() {
        let reader = FixedTags(vec![(
            "UserComment",
            scalar("a dog\nSteps: 12, Seed: 5")
        )]);
        let report = extract_with(&reader, &[], &FileInfo::new("dog.jpg", 10));
        let params = report.metadata.ai.parsed_parameters.unwrap();

        assert_eq!(params.steps.as_deref(), Some("12"));
        assert_eq!(params.seed.as_deref(), Some("5"));
    }

    #[test]
    fn user_comment_without_steps_is_ignored() {
        let reader = FixedTags(vec![("UserComment", scalar("holiday"))]);
        let report = extract_with(&reader, &[], &FileInfo::new("a.jpg", 1));

        assert!(report.metadata.ai.parsed_parameters.is_none());
    }

    #[test]
    fn reader_failure_is_a_warning() {
        let info = FileInfo {
            name:          "broken.jpg".to_string(),
            size:          4,
            last_modified: Some(1000),
            mime_type:     Some("image/x-custom".to_string())
        };
        let report = extract_with(&Failing, &[0xFF, 0xD8, 0xFF, 0xE0], &info);

        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("corrupt IFD"));
        assert!(report.metadata.tags.is_empty());
        assert_eq!(report.metadata.last_modified, Some(1000));
        assert_eq!(report.metadata.mime_type, "image/x-custom");
    }
}
