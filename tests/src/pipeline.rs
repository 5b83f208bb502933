/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;

use retrobit_image::codecs::decode;
use retrobit_image::errors::ImageErrors;
use retrobit_image::pipelines::no_progress;
use retrobit_imageprocs::retro::{RetroPipeline, TransformParameters};
use zune_core::colorspace::ColorSpace;
use zune_core::result::DecodingResult;
use zune_png::PngDecoder;

use crate::{encode, hash, random_image};

#[test]
fn encoded_png_decodes_to_same_pixels() {
    let image = random_image(47, 31, 11);
    let png = encode(&image);

    let mut decoder = PngDecoder::new(&png);
    let pixels = decoder.decode().unwrap();

    assert_eq!(decoder.get_dimensions(), Some((47, 31)));
    assert_eq!(decoder.get_colorspace(), Some(ColorSpace::RGBA));

    match pixels {
        DecodingResult::U8(data) => assert_eq!(data, image.pixels()),
        _ => panic!("Expected 8 bit samples")
    }
}

#[test]
fn decode_process_encode() {
    let source = encode(&random_image(128, 96, 21));

    let image = decode(&source).unwrap();
    assert_eq!(image.dimensions(), (128, 96));

    let parameters = TransformParameters::new(4, 16)
        .unwrap()
        .set_quantize(true)
        .set_rescale(true);

    let mut lines = vec![];
    let output = RetroPipeline::new(parameters)
        .run(image, &mut |x: &str| lines.push(x.to_string()))
        .unwrap();

    assert_eq!(output.dimensions(), (128, 96));
    assert_eq!(
        lines,
        vec![
            "Downscale: 32x24",
            "Quantize (16 colors): 32x24",
            "Rescale: 128x96"
        ]
    );

    let round_trip = decode(&encode(&output)).unwrap();
    assert_eq!(round_trip, output);
    assert!(round_trip.rgb_pixels().collect::<HashSet<_>>().len() <= 16);

    // every 4x4 block is a single color
    for y in 0..96 {
        for x in 0..128 {
            assert_eq!(
                round_trip.pixel(x, y),
                round_trip.pixel(x - x % 4, y - y % 4)
            );
        }
    }
}

#[test]
fn pipeline_is_deterministic() {
    let parameters = TransformParameters::default()
        .set_quantize(true)
        .set_rgb555(true);
    let pipeline = RetroPipeline::new(parameters);

    let first = pipeline
        .run(random_image(64, 64, 2), &mut no_progress)
        .unwrap();
    let second = pipeline
        .run(random_image(64, 64, 2), &mut no_progress)
        .unwrap();

    assert_eq!(hash(&encode(&first)), hash(&encode(&second)));
}

#[test]
fn snes_crop_from_large_image() {
    let parameters = TransformParameters::new(2, 64).unwrap().set_snescrop(true);
    let output = RetroPipeline::new(parameters)
        .run(random_image(640, 480, 8), &mut no_progress)
        .unwrap();

    assert_eq!(output.dimensions(), (256, 224));
}

#[test]
fn aborted_run_returns_no_image() {
    let abort = AtomicBool::new(true);
    let result = RetroPipeline::new(TransformParameters::default()).run_with_abort(
        random_image(16, 16, 4),
        &abort,
        &mut no_progress
    );

    assert!(matches!(result, Err(ImageErrors::Aborted(_))));
}

#[test]
fn non_image_input_is_rejected() {
    let result = decode(b"definitely not an image");
    assert!(matches!(
        result,
        Err(ImageErrors::ImageDecoderNotImplemented(_))
    ));
}
