/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "serde-support")]

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::codecs::ImageFormat;
use crate::metadata::{
    AiMetadata, GenerationParameters, Lora, Metadata, MetadataReport, TagValue
};

impl Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        // REMEMBER: If you add a field to Metadata add it here
        const STRUCT_FIELDS: usize = 9;
        let mut state = serializer.serialize_struct("Metadata", STRUCT_FIELDS)?;

        state.serialize_field("format", &self.format)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("last_modified", &self.last_modified)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.mime_type)?;
        state.serialize_field("tags", &self.tags)?;
        state.serialize_field("exif", &self.exif)?;
        state.serialize_field("png", &self.png)?;
        state.serialize_field("ai", &self.ai)?;

        state.end()
    }
}

impl Serialize for AiMetadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("AiMetadata", 2)?;

        state.serialize_field("raw", &self.raw)?;
        state.serialize_field("parsed_parameters", &self.parsed_parameters)?;

        state.end()
    }
}

impl Serialize for MetadataReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("MetadataReport", 2)?;

        state.serialize_field("metadata", &self.metadata)?;
        state.serialize_field("warnings", &self.warnings)?;

        state.end()
    }
}

impl Serialize for TagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match self {
            Self::Scalar(value) => serializer.serialize_str(value),
            Self::Array(values) => values.serialize(serializer),
            Self::Described { description, value } => {
                let mut state = serializer.serialize_struct("Described", 2)?;

                state.serialize_field("description", description)?;
                state.serialize_field("value", value)?;

                state.end()
            }
        }
    }
}

impl Serialize for GenerationParameters {
    /// Only fields that are present are written, `extra` is flattened
    /// into the same map
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let strings = [
            ("positive_prompt", &self.positive_prompt),
            ("negative_prompt", &self.negative_prompt),
            ("steps", &self.steps),
            ("sampler", &self.sampler),
            ("schedule_type", &self.schedule_type),
            ("cfg_scale", &self.cfg_scale),
            ("seed", &self.seed),
            ("size", &self.size),
            ("model_hash", &self.model_hash),
            ("model", &self.model),
            ("vae_hash", &self.vae_hash),
            ("vae", &self.vae),
            ("lora_hashes", &self.lora_hashes),
            ("version", &self.version)
        ];
        let mut map = serializer.serialize_map(None)?;

        for (key, value) in strings {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        if let Some(width) = self.width {
            map.serialize_entry("width", &width)?;
        }
        if let Some(height) = self.height {
            map.serialize_entry("height", &height)?;
        }
        if !self.loras.is_empty() {
            map.serialize_entry("loras", &self.loras)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Lora {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("Lora", 3)?;

        state.serialize_field("name", &self.name)?;
        state.serialize_field("weight", &self.weight)?;
        state.serialize_field("hash", &self.hash)?;

        state.end()
    }
}

impl Serialize for ImageFormat {
    #[allow(clippy::uninlined_format_args)]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(&format!("{:?}", self))
    }
}
