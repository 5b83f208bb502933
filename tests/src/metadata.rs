/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::borrow::Cow;
use std::collections::BTreeMap;

use retrobit_image::metadata::{
    extract, preserve_metadata, preserve_metadata_at, FileInfo, TagValue
};
use retrobit_png::{crc32, parse_chunks, read_text_chunks, PngChunkType};
use serde::Deserialize;

use crate::{encode, encode_with_exif, encode_with_text, exif_tiff, random_image};

const PARAMETERS: &str = "a castle on a hill, <lora:pixel_style:0.8>
Negative prompt: blurry, lowres
Steps: 20, Sampler: Euler a, CFG scale: 7, Seed: 1234, Size: 512x768, Model hash: abc123, Model: dreamshaper, Lora hashes: \"pixel_style: 0f1e2d\"";

#[derive(Deserialize)]
struct JsonReport {
    metadata: JsonMetadata,
    warnings: Vec<String>
}

#[derive(Deserialize)]
struct JsonMetadata {
    name:      String,
    #[serde(rename = "type")]
    mime_type: String,
    format:    String,
    size:      u64,
    png:       BTreeMap<String, String>,
    ai:        JsonAi
}

#[derive(Deserialize)]
struct JsonAi {
    raw:               BTreeMap<String, String>,
    parsed_parameters: Option<JsonParameters>
}

#[derive(Deserialize)]
struct JsonParameters {
    steps:  Option<String>,
    seed:   Option<String>,
    width:  Option<u32>,
    height: Option<u32>,
    loras:  Vec<JsonLora>
}

#[derive(Deserialize)]
struct JsonLora {
    name:   String,
    weight: f32,
    hash:   Option<String>
}

fn generated_png() -> Vec<u8> {
    encode_with_text(
        &random_image(16, 16, 77),
        &[("parameters", PARAMETERS), ("Comment", "made by hand")]
    )
}

#[test]
fn generation_parameters_from_png_text() {
    let png = generated_png();
    let report = extract(&png, &FileInfo::new("castle.png", png.len() as u64));
    let metadata = &report.metadata;

    assert_eq!(metadata.mime_type, "image/png");
    assert!(metadata.ai.raw.contains_key("parameters"));
    assert_eq!(
        metadata.png.get("Comment"),
        Some(&TagValue::Scalar("made by hand".to_string()))
    );

    let params = metadata.ai.parsed_parameters.as_ref().unwrap();

    assert_eq!(params.negative_prompt.as_deref(), Some("blurry, lowres"));
    assert_eq!(params.steps.as_deref(), Some("20"));
    assert_eq!(params.sampler.as_deref(), Some("Euler a"));
    assert_eq!(params.cfg_scale.as_deref(), Some("7"));
    assert_eq!(params.width, Some(512));
    assert_eq!(params.height, Some(768));
    assert_eq!(params.model.as_deref(), Some("dreamshaper"));

    assert_eq!(params.loras.len(), 1);
    assert_eq!(params.loras[0].name, "pixel_style");
    assert!((params.loras[0].weight - 0.8).abs() < 1e-6);
    assert_eq!(params.loras[0].hash.as_deref(), Some("0f1e2d"));

    assert!(params
        .positive_prompt
        .as_deref()
        .is_some_and(|x| x.contains("castle") && !x.contains("<lora")));
}

#[test]
fn metadata_survives_processing() {
    let source = generated_png();
    let report = extract(&source, &FileInfo::new("castle.png", source.len() as u64));

    // a fresh output, as the pipeline would produce
    let output = encode(&random_image(4, 4, 1));
    let preserved =
        preserve_metadata_at(&output, Some(&report.metadata), "2024-02-29T12:34:56.789Z");

    let chunks = parse_chunks(&preserved).unwrap();

    assert_eq!(chunks.first().map(|x| x.kind()), Some(PngChunkType::IHDR));
    assert_eq!(chunks.last().map(|x| x.kind()), Some(PngChunkType::IEND));

    for chunk in &chunks {
        let mut covered = chunk.chunk_type.to_vec();
        covered.extend_from_slice(&chunk.data);
        assert_eq!(chunk.crc, crc32(&covered));
    }

    let texts = read_text_chunks(&chunks);
    let find = |keyword: &str| {
        texts
            .iter()
            .find(|x| x.keyword == keyword)
            .map(|x| x.text.clone())
    };

    assert_eq!(find("Source").as_deref(), Some("castle.png"));
    assert_eq!(find("Steps").as_deref(), Some("20"));
    assert_eq!(find("Seed").as_deref(), Some("1234"));
    assert_eq!(find("Size").as_deref(), Some("512x768"));
    assert_eq!(
        find("Processing Date").as_deref(),
        Some("2024-02-29T12:34:56.789Z")
    );
    assert!(find("Software").is_some_and(|x| x.starts_with("retrobit")));
    assert!(find("parameters").is_some_and(|x| x.contains("Negative prompt: blurry, lowres")));

    // and the result can be read again
    let again = extract(&preserved, &FileInfo::new("out.png", preserved.len() as u64));
    let params = again.metadata.ai.parsed_parameters.unwrap();

    assert_eq!(params.steps.as_deref(), Some("20"));
    assert_eq!(params.model.as_deref(), Some("dreamshaper"));
}

#[test]
fn absent_metadata_is_a_no_op() {
    let output = encode(&random_image(4, 4, 1));

    assert!(matches!(preserve_metadata(&output, None), Cow::Borrowed(_)));
    assert!(matches!(
        preserve_metadata(b"not a png", None),
        Cow::Borrowed(_)
    ));
}

#[test]
fn report_serializes_to_json() {
    let png = generated_png();
    let mut info = FileInfo::new("castle.png", png.len() as u64);
    info.last_modified = Some(1_709_210_096_789);

    let report = extract(&png, &info);
    let json = serde_json::to_string(&report).unwrap();

    let parsed: JsonReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.metadata.name, "castle.png");
    assert_eq!(parsed.metadata.mime_type, "image/png");
    assert_eq!(parsed.metadata.format, "Png");
    assert_eq!(parsed.metadata.size, png.len() as u64);
    assert_eq!(
        parsed.metadata.png.get("Comment").map(String::as_str),
        Some("made by hand")
    );
    assert!(parsed.metadata.ai.raw.contains_key("parameters"));

    let params = parsed.metadata.ai.parsed_parameters.unwrap();

    assert_eq!(params.steps.as_deref(), Some("20"));
    assert_eq!(params.seed.as_deref(), Some("1234"));
    assert_eq!((params.width, params.height), (Some(512), Some(768)));
    assert_eq!(params.loras[0].name, "pixel_style");
    assert!((params.loras[0].weight - 0.8).abs() < 1e-6);
    assert_eq!(params.loras[0].hash.as_deref(), Some("0f1e2d"));
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
}

fn assert_camera_exif(exif: &BTreeMap<String, TagValue>) {
    assert_eq!(exif.get("Make"), Some(&TagValue::Scalar("Nikon".to_string())));
    assert_eq!(
        exif.get("ExposureTime"),
        Some(&TagValue::Described {
            description: Some("1/250 s".to_string()),
            value:       Some("1/250".to_string())
        })
    );
}

#[test]
fn exif_from_tiff_and_png() {
    let tiff = exif_tiff();
    let report = extract(&tiff, &FileInfo::new("photo.tif", tiff.len() as u64));

    assert_eq!(report.metadata.mime_type, "image/tiff");
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_camera_exif(&report.metadata.exif);

    let png = encode_with_exif(&random_image(4, 4, 9), exif_tiff());
    let report = extract(&png, &FileInfo::new("photo.png", png.len() as u64));

    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_camera_exif(&report.metadata.exif);
}

#[test]
fn only_plain_exif_text_is_preserved() {
    let png = encode_with_exif(&random_image(4, 4, 9), exif_tiff());
    let report = extract(&png, &FileInfo::new("photo.png", png.len() as u64));

    let output = encode(&random_image(2, 2, 3));
    let preserved =
        preserve_metadata_at(&output, Some(&report.metadata), "2024-02-29T12:34:56.789Z");
    let texts = read_text_chunks(&parse_chunks(&preserved).unwrap());

    assert!(texts
        .iter()
        .any(|x| x.keyword == "EXIF:Make" && x.text == "Nikon"));
    assert!(!texts.iter().any(|x| x.keyword == "EXIF:ExposureTime"));
}
