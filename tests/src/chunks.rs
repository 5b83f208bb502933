/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use retrobit_png::{
    build_chunks, crc32, is_png, make_text_chunk, parse_chunks, read_text_chunks, PngChunkType
};

use crate::{encode, encode_with_text, random_image};

#[test]
fn crc_matches_zlib() {
    assert_eq!(crc32(b""), 0);
    assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    assert_eq!(crc32(b"IEND"), 0xAE42_6082);
}

#[test]
fn encoder_output_has_valid_crcs() {
    let png = encode(&random_image(33, 17, 5));

    assert!(is_png(&png));
    for chunk in parse_chunks(&png).unwrap() {
        let mut covered = chunk.chunk_type.to_vec();
        covered.extend_from_slice(&chunk.data);

        assert_eq!(chunk.crc, crc32(&covered), "bad crc for {}", chunk.name());
    }
}

#[test]
fn rebuilding_is_byte_exact() {
    let png = encode_with_text(&random_image(8, 8, 3), &[("Comment", "hello")]);
    let rebuilt = build_chunks(&parse_chunks(&png).unwrap());

    assert_eq!(png, rebuilt);
}

#[test]
fn text_chunks_round_trip() {
    let png = encode_with_text(
        &random_image(4, 4, 9),
        &[("Title", "caf\u{e9}"), ("Comment", "hi")]
    );
    let texts = read_text_chunks(&parse_chunks(&png).unwrap());

    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].keyword, "Title");
    assert_eq!(texts[0].text, "caf\u{e9}");
    assert_eq!(texts[1].text, "hi");
}

#[test]
fn invalid_keywords_are_refused() {
    assert!(make_text_chunk("", "text").is_none());
    assert!(make_text_chunk(&"k".repeat(80), "text").is_none());
    assert!(make_text_chunk(&"k".repeat(79), "text").is_some());
}

#[test]
fn iend_is_last() {
    let png = encode_with_text(&random_image(2, 2, 1), &[("Comment", "x")]);
    let chunks = parse_chunks(&png).unwrap();

    assert_eq!(chunks.first().map(|x| x.kind()), Some(PngChunkType::IHDR));
    assert_eq!(chunks.last().map(|x| x.kind()), Some(PngChunkType::IEND));
    assert_eq!(chunks[chunks.len() - 2].kind(), PngChunkType::tEXt);
}
