/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Browser front-end for retrobit
//!
//! The page decodes the source image through a canvas and hands us RGBA
//! pixels, we run the retro pipeline, encode the result as PNG and carry the
//! source file's metadata over.
use log::{debug, info, warn};
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::PixelBuffer;
use retrobit_image::metadata::{extract, preserve_metadata, FileInfo, MetadataReport};
use retrobit_imageprocs::retro::{RetroPipeline, TransformParameters};
use retrobit_png::PngEncoder;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::utils::set_panic_hook;

mod utils;

#[wasm_bindgen(start)]
pub fn setup() {
    wasm_logger::init(wasm_logger::Config::default());
    set_panic_hook();
    info!("retrobit-wasm is live");
}

/// Options for [`process`], mirrors the command line flags
#[wasm_bindgen]
#[derive(Copy, Clone, Debug)]
pub struct RetroParams {
    pub scale:    usize,
    pub colors:   usize,
    pub quantize: bool,
    pub rgb555:   bool,
    pub snescrop: bool,
    pub rescale:  bool
}

#[wasm_bindgen]
impl RetroParams {
    #[wasm_bindgen(constructor)]
    pub fn new(scale: usize, colors: usize) -> RetroParams {
        RetroParams {
            scale,
            colors,
            quantize: false,
            rgb555: false,
            snescrop: false,
            rescale: false
        }
    }
}

impl Default for RetroParams {
    fn default() -> Self {
        let defaults = TransformParameters::default();
        RetroParams::new(defaults.scale(), defaults.colors())
    }
}

impl RetroParams {
    fn to_parameters(self) -> Result<TransformParameters, ImageErrors> {
        Ok(TransformParameters::new(self.scale, self.colors)?
            .set_quantize(self.quantize)
            .set_rgb555(self.rgb555)
            .set_snescrop(self.snescrop)
            .set_rescale(self.rescale))
    }
}

/// The output of the retro pipeline, RGBA pixels
#[wasm_bindgen]
pub struct ProcessedImage {
    image: PixelBuffer
}

#[wasm_bindgen]
impl ProcessedImage {
    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    /// A copy of the RGBA pixels, ready for `ImageData`
    pub fn pixels(&self) -> Vec<u8> {
        self.image.pixels().to_vec()
    }
}

fn to_js_error(error: &ImageErrors) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn process_inner<F: FnMut(&str)>(
    pixels: &[u8], width: usize, height: usize, params: RetroParams, progress: &mut F
) -> Result<PixelBuffer, ImageErrors> {
    let start = Instant::now();

    let image = PixelBuffer::new(pixels.to_vec(), width, height)?;
    let pipeline = RetroPipeline::new(params.to_parameters()?);
    let output = pipeline.run(image, progress)?;

    debug!("Processed image in {} ms", start.elapsed().as_millis());
    Ok(output)
}

/// Run the retro pipeline over canvas pixels
///
/// `progress`, if given, is called with one line of text per finished stage.
#[wasm_bindgen]
pub fn process(
    pixels: &[u8], width: usize, height: usize, params: &RetroParams,
    progress: Option<js_sys::Function>
) -> Result<ProcessedImage, JsValue> {
    let this = JsValue::NULL;

    let mut report = |line: &str| {
        if let Some(callback) = &progress {
            let _ = callback.call1(&this, &JsValue::from_str(line));
        }
    };

    process_inner(pixels, width, height, *params, &mut report)
        .map(|image| ProcessedImage { image })
        .map_err(|x| to_js_error(&x))
}

fn file_info(name: &str, size: usize, last_modified: Option<f64>) -> FileInfo {
    let mut info = FileInfo::new(name, size as u64);
    // javascript timestamps are milliseconds as a double
    info.last_modified = last_modified
        .filter(|x| x.is_finite() && *x >= 0.0)
        .map(|x| x as u64);
    info
}

/// Metadata of a loaded source file
///
/// Extracted once by [`extract_metadata`] and handed back to [`encode_png`]
/// when saving.
#[wasm_bindgen]
pub struct SourceMetadata {
    report: MetadataReport
}

#[wasm_bindgen]
impl SourceMetadata {
    /// The metadata and its warnings as a JSON document
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.report).map_err(|x| JsValue::from_str(&x.to_string()))
    }
}

fn encode_png_inner(
    image: &PixelBuffer, metadata: Option<&MetadataReport>
) -> Result<Vec<u8>, ImageErrors> {
    let (width, height) = image.dimensions();
    let png = PngEncoder::new(image.pixels(), width, height).encode()?;

    Ok(preserve_metadata(&png, metadata.map(|x| &x.metadata)).into_owned())
}

/// Encode a processed image as PNG
///
/// When `metadata` is given it is written into the PNG as text chunks, the
/// handle is consumed on the JS side.
#[wasm_bindgen]
pub fn encode_png(
    image: &ProcessedImage, metadata: Option<SourceMetadata>
) -> Result<Vec<u8>, JsValue> {
    encode_png_inner(&image.image, metadata.as_ref().map(|x| &x.report))
        .map_err(|x| to_js_error(&x))
}

fn extract_metadata_inner(
    bytes: &[u8], name: &str, last_modified: Option<f64>
) -> MetadataReport {
    let report = extract(bytes, &file_info(name, bytes.len(), last_modified));

    for warning in &report.warnings {
        warn!("{warning}");
    }
    report
}

/// Extract metadata from a freshly loaded file
///
/// `last_modified` is the `File.lastModified` timestamp in milliseconds.
#[wasm_bindgen]
pub fn extract_metadata(bytes: &[u8], name: &str, last_modified: Option<f64>) -> SourceMetadata {
    SourceMetadata {
        report: extract_metadata_inner(bytes, name, last_modified)
    }
}
