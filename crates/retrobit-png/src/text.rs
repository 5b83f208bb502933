/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Keyword/text chunks
//!
//! PNG carries textual metadata in three chunk kinds
//! - `tEXt`: Latin-1 keyword and Latin-1 text
//! - `zTXt`: Latin-1 keyword and zlib compressed Latin-1 text
//! - `iTXt`: Latin-1 keyword, language tags and optionally compressed UTF-8 text
//!
//! Writing only produces `tEXt` chunks.
use retrobit_core::bytestream::ByteReader;
use retrobit_core::log::warn;
use zune_inflate::DeflateDecoder;

use crate::chunk::{PngChunk, PngChunkType};
use crate::constants::MAX_KEYWORD_LENGTH;
use crate::crc::{CrcTable, DEFAULT_TABLE};
use crate::error::PngErrors;

/// The chunk a [`TextChunk`] was read from
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextChunkKind {
    /// `tEXt`
    Text,
    /// `zTXt`
    Compressed,
    /// `iTXt`
    International
}

/// A decoded keyword/text pair
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TextChunk {
    pub kind:    TextChunkKind,
    pub keyword: String,
    pub text:    String
}

/// Create a `tEXt` chunk with `keyword` and `text`
///
/// Both strings are encoded to Latin-1 one UTF-16 code unit at a time,
/// units above 255 become `?`, so a character outside the basic
/// multilingual plane becomes `??`.
///
/// Returns `None` if the keyword is empty or longer than 79 UTF-16 code units.
///
/// ```
/// use retrobit_png::make_text_chunk;
///
/// let chunk = make_text_chunk("Title", "café").unwrap();
/// assert_eq!(&chunk.chunk_type, b"tEXt");
/// assert_eq!(chunk.data, b"Title\0caf\xE9");
///
/// assert!(make_text_chunk("", "empty keyword").is_none());
/// ```
pub fn make_text_chunk(keyword: &str, text: &str) -> Option<PngChunk> {
    text_chunk_with_table(keyword, text, &DEFAULT_TABLE)
}

pub(crate) fn text_chunk_with_table(
    keyword: &str, text: &str, table: &CrcTable
) -> Option<PngChunk> {
    let keyword_length = keyword.encode_utf16().count();

    if keyword_length == 0 || keyword_length > MAX_KEYWORD_LENGTH {
        warn!(
            "Keyword length {} is outside 1..={}, skipping text chunk",
            keyword_length, MAX_KEYWORD_LENGTH
        );
        return None;
    }
    let mut data = Vec::with_capacity(keyword_length + 1 + text.len());

    encode_latin1(keyword, &mut data);
    data.push(0);
    encode_latin1(text, &mut data);

    Some(PngChunk::new(*b"tEXt", data, table))
}

fn encode_latin1(string: &str, output: &mut Vec<u8>) {
    output.extend(
        string
            .encode_utf16()
            .map(|unit| u8::try_from(unit).unwrap_or(b'?'))
    );
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|x| char::from(*x)).collect()
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, PngErrors> {
    DeflateDecoder::new(data)
        .decode_zlib()
        .map_err(|e| PngErrors::ZlibDecode(format!("{e:?}")))
}

fn read_keyword<'a>(stream: &mut ByteReader<'a>) -> Result<&'a [u8], PngErrors> {
    stream
        .get_null_terminated()
        .ok_or(PngErrors::GenericStatic("Keyword is not null terminated"))
}

fn decode_text(data: &[u8]) -> Result<TextChunk, PngErrors> {
    let mut stream = ByteReader::new(data);
    let keyword = read_keyword(&mut stream)?;

    Ok(TextChunk {
        kind:    TextChunkKind::Text,
        keyword: decode_latin1(keyword),
        text:    decode_latin1(stream.remaining_bytes())
    })
}

fn decode_ztxt(data: &[u8]) -> Result<TextChunk, PngErrors> {
    let mut stream = ByteReader::new(data);
    let keyword = read_keyword(&mut stream)?;
    let method = stream.get_u8_err()?;

    if method != 0 {
        return Err(PngErrors::Generic(format!(
            "Unknown zTXt compression method {method}"
        )));
    }
    let text = inflate(stream.remaining_bytes())?;

    Ok(TextChunk {
        kind:    TextChunkKind::Compressed,
        keyword: decode_latin1(keyword),
        text:    decode_latin1(&text)
    })
}

fn decode_itxt(data: &[u8]) -> Result<TextChunk, PngErrors> {
    let mut stream = ByteReader::new(data);
    let keyword = read_keyword(&mut stream)?;
    let compressed = stream.get_u8_err()?;
    let method = stream.get_u8_err()?;
    // language tag and translated keyword, unused
    let _ = read_keyword(&mut stream)?;
    let _ = read_keyword(&mut stream)?;

    let text = stream.remaining_bytes();

    let text = match (compressed, method) {
        (0, _) => String::from_utf8_lossy(text).into_owned(),
        (1, 0) => String::from_utf8_lossy(&inflate(text)?).into_owned(),
        _ => {
            return Err(PngErrors::Generic(format!(
                "Unknown iTXt compression flag {compressed} and method {method}"
            )))
        }
    };

    Ok(TextChunk {
        kind: TextChunkKind::International,
        keyword: decode_latin1(keyword),
        text
    })
}

/// Decode every `tEXt`, `zTXt` and `iTXt` chunk in `chunks`
///
/// Results are in stream order, malformed chunks are skipped with a warning.
pub fn read_text_chunks(chunks: &[PngChunk]) -> Vec<TextChunk> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let result = match chunk.kind() {
                PngChunkType::tEXt => decode_text(&chunk.data),
                PngChunkType::zTXt => decode_ztxt(&chunk.data),
                PngChunkType::iTXt => decode_itxt(&chunk.data),
                _ => return None
            };
            match result {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!("Skipping malformed {} chunk: {:?}", chunk.name(), err);
                    None
                }
            }
        })
        .collect()
}
