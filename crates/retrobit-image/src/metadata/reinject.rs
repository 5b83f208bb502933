/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Writing metadata back into PNG output as `tEXt` chunks
use std::borrow::Cow;

use retrobit_core::log::{info, trace, warn};
use retrobit_png::error::PngErrors;
use retrobit_png::{is_png, ChunkCodec, PngChunkType};

use crate::metadata::parameters::GenerationParameters;
use crate::metadata::timestamp::iso8601_now;
use crate::metadata::Metadata;

static CODEC: ChunkCodec = ChunkCodec::new();

const SOFTWARE: &str = concat!("retrobit ", env!("CARGO_PKG_VERSION"));

/// Embed `metadata` into an encoded PNG, stamped with the current time
///
/// See [`preserve_metadata_at`]
pub fn preserve_metadata<'a>(png: &'a [u8], metadata: Option<&Metadata>) -> Cow<'a, [u8]> {
    preserve_metadata_at(png, metadata, &iso8601_now())
}

/// Embed `metadata` into an encoded PNG as `tEXt` chunks
///
/// The chunks are the ones returned by [`text_entries`], placed right
/// before `IEND`. Entries with keywords PNG can't store are skipped.
///
/// This never fails, the input is returned unchanged (borrowed) when
/// `metadata` is `None`, when `png` is not a PNG stream or when anything
/// goes wrong while splicing.
///
/// ```
/// use std::borrow::Cow;
/// use retrobit_image::codecs::ImageFormat;
/// use retrobit_image::metadata::{preserve_metadata_at, Metadata};
///
/// let metadata = Metadata::new("photo.jpg", 100, ImageFormat::Jpeg);
/// let not_png = b"GIF89a";
///
/// let output = preserve_metadata_at(not_png, Some(&metadata), "2024-01-01T00:00:00.000Z");
/// assert!(matches!(output, Cow::Borrowed(_)));
/// ```
pub fn preserve_metadata_at<'a>(
    png: &'a [u8], metadata: Option<&Metadata>, timestamp: &str
) -> Cow<'a, [u8]> {
    let Some(metadata) = metadata else {
        trace!("No metadata to preserve");
        return Cow::Borrowed(png);
    };
    if !is_png(png) {
        info!("Output is not a PNG stream, metadata not preserved");
        return Cow::Borrowed(png);
    }
    match splice_text_chunks(png, metadata, timestamp) {
        Ok(output) => Cow::Owned(output),
        Err(err) => {
            warn!("Could not preserve metadata: {:?}", err);
            Cow::Borrowed(png)
        }
    }
}

fn splice_text_chunks(png: &[u8], metadata: &Metadata, timestamp: &str) -> Result<Vec<u8>, PngErrors> {
    let chunks = CODEC.parse(png)?;

    if chunks.first().map(|x| x.kind()) != Some(PngChunkType::IHDR) {
        return Err(PngErrors::MissingIhdr);
    }
    let entries = text_entries(metadata, timestamp);

    let text_chunks: Vec<_> = entries
        .iter()
        .filter_map(|(keyword, text)| CODEC.make_text_chunk(keyword, text))
        .collect();

    trace!(
        "Writing {} of {} metadata entries",
        text_chunks.len(),
        entries.len()
    );
    let chunks = CODEC.insert_before_iend(chunks, text_chunks)?;

    Ok(CODEC.build(&chunks))
}

/// The keyword/text pairs written for `metadata`, in writing order
///
/// - `Source`: the original file name
/// - `Positive Prompt`, `Negative Prompt`, `Steps`, `Sampler`, `CFG Scale`,
///   `Seed`, `Model`, `Size`: from the parsed generation parameters
/// - `parameters`: the generation parameters in AUTOMATIC1111 layout
/// - `EXIF:<key>`: every plain string EXIF tag
/// - `Software` and `Processing Date`
///
/// Entries are only present when they have a value, except the last two.
pub fn text_entries(metadata: &Metadata, timestamp: &str) -> Vec<(String, String)> {
    let mut entries = vec![];

    let mut push = |keyword: &str, text: &str| {
        entries.push((keyword.to_string(), text.to_string()));
    };

    if !metadata.name.is_empty() {
        push("Source", &metadata.name);
    }

    if let Some(params) = &metadata.ai.parsed_parameters {
        let fields = [
            ("Positive Prompt", &params.positive_prompt),
            ("Negative Prompt", &params.negative_prompt),
            ("Steps", &params.steps),
            ("Sampler", &params.sampler),
            ("CFG Scale", &params.cfg_scale),
            ("Seed", &params.seed),
            ("Model", &params.model),
            ("Size", &params.size)
        ];
        for (keyword, value) in fields {
            if let Some(value) = value {
                push(keyword, value);
            }
        }
        let combined = a1111_parameters(params);

        if !combined.is_empty() {
            push("parameters", &combined);
        }
    }

    for (key, value) in &metadata.exif {
        if let Some(text) = value.as_str().filter(|x| !x.trim().is_empty()) {
            push(&format!("EXIF:{key}"), text);
        }
    }
    push("Software", SOFTWARE);
    push("Processing Date", timestamp);

    entries
}

/// Rebuild the combined parameters text the way AUTOMATIC1111 writes it
fn a1111_parameters(params: &GenerationParameters) -> String {
    let mut lines = vec![];

    if let Some(positive) = &params.positive_prompt {
        lines.push(positive.clone());
    }
    if let Some(negative) = &params.negative_prompt {
        lines.push(format!("Negative prompt: {negative}"));
    }
    let settings = [
        ("Steps", &params.steps),
        ("Sampler", &params.sampler),
        ("Schedule type", &params.schedule_type),
        ("CFG scale", &params.cfg_scale),
        ("Seed", &params.seed),
        ("Size", &params.size),
        ("Model", &params.model),
        ("Model hash", &params.model_hash),
        ("VAE", &params.vae),
        ("VAE hash", &params.vae_hash),
        ("Version", &params.version)
    ];
    let settings: Vec<String> = settings
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|x| format!("{key}: {x}")))
        .collect();

    if !settings.is_empty() {
        lines.push(settings.join(", "));
    }
    lines.join("\n")
}
