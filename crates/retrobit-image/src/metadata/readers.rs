/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tag readers, turning raw file bytes into a flat [`TagMap`]
use retrobit_core::log::{trace, warn};
use retrobit_png::{is_png, parse_chunks, read_text_chunks};

use crate::metadata::tags::{TagMap, TagValue};
use crate::metadata::MetadataError;

/// Something that can read metadata tags from raw file bytes
///
/// Readers return an empty map for files they don't understand,
/// errors are reserved for files they understand but can't read.
pub trait TagReader {
    /// Get the name of this reader
    fn name(&self) -> &'static str;

    /// Read every tag in `bytes`
    fn read_tags(&self, bytes: &[u8]) -> Result<TagMap, MetadataError>;

    /// Read tags, returning whatever was read alongside every error hit
    fn read_tags_lossy(&self, bytes: &[u8]) -> (TagMap, Vec<MetadataError>) {
        match self.read_tags(bytes) {
            Ok(tags) => (tags, vec![]),
            Err(err) => (TagMap::new(), vec![err])
        }
    }
}

/// Reads `tEXt`, `zTXt` and `iTXt` chunks of PNG files
///
/// Each keyword becomes a [`TagValue::Scalar`], the first chunk wins for
/// repeated keywords.
#[derive(Copy, Clone, Debug, Default)]
pub struct PngTextTagReader;

impl TagReader for PngTextTagReader {
    fn name(&self) -> &'static str {
        "png-text"
    }

    fn read_tags(&self, bytes: &[u8]) -> Result<TagMap, MetadataError> {
        let mut tags = TagMap::new();

        if !is_png(bytes) {
            return Ok(tags);
        }
        let chunks = parse_chunks(bytes)?;

        for text in read_text_chunks(&chunks) {
            tags.entry(text.keyword)
                .or_insert(TagValue::Scalar(text.text));
        }
        trace!("Read {} PNG text tags", tags.len());

        Ok(tags)
    }
}

/// Reads EXIF tags from JPEG, TIFF and PNG (`eXIf` chunk) files
///
/// Only tags of the primary image are read, thumbnail tags are ignored.
/// ASCII fields and the `UserComment` become [`TagValue::Scalar`], anything
/// else becomes [`TagValue::Described`] with the unit in the description.
///
/// This requires the `metadata` feature
#[cfg(feature = "metadata")]
#[derive(Copy, Clone, Debug, Default)]
pub struct ExifTagReader;

#[cfg(feature = "metadata")]
impl ExifTagReader {
    fn read_exif(bytes: &[u8]) -> Result<Option<exif::Exif>, exif::Error> {
        use crate::codecs::ImageFormat;

        let reader = exif::Reader::new();

        let result = match ImageFormat::guess_format(bytes) {
            ImageFormat::Jpeg | ImageFormat::Tiff => {
                reader.read_from_container(&mut std::io::Cursor::new(bytes))
            }
            ImageFormat::Png => {
                let Ok(chunks) = parse_chunks(bytes) else {
                    return Ok(None);
                };
                match chunks.into_iter().find(|x| &x.chunk_type == b"eXIf") {
                    Some(chunk) => reader.read_raw(chunk.data),
                    None => return Ok(None)
                }
            }
            _ => return Ok(None)
        };
        match result {
            Ok(exif) => Ok(Some(exif)),
            Err(exif::Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err)
        }
    }
}

#[cfg(feature = "metadata")]
impl TagReader for ExifTagReader {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn read_tags(&self, bytes: &[u8]) -> Result<TagMap, MetadataError> {
        let mut tags = TagMap::new();

        let exif = match Self::read_exif(bytes) {
            Ok(Some(exif)) => exif,
            Ok(None) => {
                trace!("No EXIF data present");
                return Ok(tags);
            }
            Err(err) => return Err(MetadataError::Exif(err.to_string()))
        };

        for field in exif.fields() {
            if field.ifd_num != exif::In::PRIMARY {
                continue;
            }
            let value = match field.value {
                exif::Value::Ascii(ref strings) => TagValue::Scalar(decode_ascii(strings)),
                exif::Value::Undefined(ref bytes, _) if field.tag == exif::Tag::UserComment => {
                    TagValue::Scalar(decode_user_comment(bytes))
                }
                _ => TagValue::Described {
                    description: Some(field.display_value().with_unit(&exif).to_string()),
                    value:       Some(field.display_value().to_string())
                }
            };
            tags.entry(field.tag.to_string()).or_insert(value);
        }
        trace!("Read {} EXIF tags", tags.len());

        Ok(tags)
    }
}

#[cfg(feature = "metadata")]
fn decode_ascii(strings: &[Vec<u8>]) -> String {
    strings
        .iter()
        .map(|x| String::from_utf8_lossy(x).trim_end_matches('\0').trim().to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// Decode an EXIF `UserComment`
///
/// The first eight bytes name the character set, `UNICODE` text carries no
/// byte order mark so the order is guessed from the first code unit.
#[cfg_attr(not(feature = "metadata"), allow(dead_code))]
pub(crate) fn decode_user_comment(bytes: &[u8]) -> String {
    const CHARSETS: [&[u8; 8]; 4] = [b"ASCII\0\0\0", b"UNICODE\0", b"JIS\0\0\0\0\0", &[0; 8]];

    let (prefix, body) = match bytes.get(..8) {
        Some(prefix) if CHARSETS.iter().any(|x| x.as_slice() == prefix) => bytes.split_at(8),
        _ => (&[][..], bytes)
    };

    let text = if prefix == b"UNICODE\0" {
        let big_endian = body.len() >= 2 && body[0] == 0 && body[1] != 0;

        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|x| {
                if big_endian {
                    u16::from_be_bytes([x[0], x[1]])
                } else {
                    u16::from_le_bytes([x[0], x[1]])
                }
            })
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(body).into_owned()
    };
    text.trim_end_matches('\0').trim().to_string()
}

/// Runs several readers over the same bytes and merges their tags
///
/// Earlier readers win when two readers return the same key. The default
/// reader runs the EXIF reader (with the `metadata` feature) followed by the
/// PNG text reader.
pub struct CombinedTagReader {
    readers: Vec<Box<dyn TagReader>>
}

impl CombinedTagReader {
    pub fn new(readers: Vec<Box<dyn TagReader>>) -> CombinedTagReader {
        CombinedTagReader { readers }
    }
}

impl Default for CombinedTagReader {
    fn default() -> Self {
        let mut readers: Vec<Box<dyn TagReader>> = vec![];

        #[cfg(feature = "metadata")]
        {
            readers.push(Box::new(ExifTagReader));
        }
        readers.push(Box::new(PngTextTagReader));

        CombinedTagReader { readers }
    }
}

impl TagReader for CombinedTagReader {
    fn name(&self) -> &'static str {
        "combined"
    }

    /// Fails only if every reader failed
    fn read_tags(&self, bytes: &[u8]) -> Result<TagMap, MetadataError> {
        let (tags, mut errors) = self.read_tags_lossy(bytes);

        if !errors.is_empty() && errors.len() == self.readers.len() {
            return Err(errors.remove(0));
        }
        Ok(tags)
    }

    fn read_tags_lossy(&self, bytes: &[u8]) -> (TagMap, Vec<MetadataError>) {
        let mut tags = TagMap::new();
        let mut errors = vec![];

        for reader in &self.readers {
            match reader.read_tags(bytes) {
                Ok(read) => {
                    for (key, value) in read {
                        tags.entry(key).or_insert(value);
                    }
                }
                Err(err) => {
                    warn!("Tag reader `{}` failed: {:?}", reader.name(), err);
                    errors.push(err);
                }
            }
        }
        (tags, errors)
    }
}

#[cfg(test)]
mod tests {
    use retrobit_png::{ChunkCodec, PngEncoder};

    use super::*;

    fn png_with_text(pairs: &[(&str, &str)]) -> Vec<u8> {
        let png = PngEncoder::new(&[0, 0, 0, 255], 1, 1).encode().unwrap();
        let codec = ChunkCodec::new();
        let chunks = codec.parse(&png).unwrap();
        let text = pairs
            .iter()
            .filter_map(|(k, v)| codec.make_text_chunk(k, v))
            .collect();
        codec.build(&codec.insert_before_iend(chunks, text).unwrap())
    }

    #[test]
    fn png_text_reader_reads_keywords() {
        let png = png_with_text(&[("parameters", "a cat\nSteps: 20"), ("Title", "x")]);
        let tags = PngTextTagReader.read_tags(&png).unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(
            tags.get("parameters"),
            Some(&TagValue::Scalar("a cat\nSteps: 20".to_string()))
        );
    }

    #[test]
    fn png_text_reader_ignores_other_formats() {
        let tags = PngTextTagReader.read_tags(&[0xFF, 0xD8, 0xFF]).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn combined_reader_merges() {
        let png = png_with_text(&[("Comment", "hello")]);
        let tags = CombinedTagReader::default().read_tags(&png).unwrap();

        assert_eq!(tags.get("Comment").map(TagValue::display).as_deref(), Some("hello"));
    }

    struct Broken;

    impl TagReader for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn read_tags(&self, _: &[u8]) -> Result<TagMap, MetadataError> {
            Err(MetadataError::Generic("broken".to_string()))
        }
    }

    #[test]
    fn combined_reader_fails_only_if_all_fail() {
        let png = png_with_text(&[("Comment", "hello")]);

        let partial = CombinedTagReader::new(vec![Box::new(Broken), Box::new(PngTextTagReader)]);
        let (tags, errors) = partial.read_tags_lossy(&png);
        assert_eq!(tags.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(partial.read_tags(&png).is_ok());

        let broken = CombinedTagReader::new(vec![Box::new(Broken)]);
        assert!(broken.read_tags(&png).is_err());
    }

    /// A little endian TIFF with `Make` in IFD0, `ExposureTime` in the Exif
    /// IFD and a thumbnail IFD holding `Model`
    #[cfg(feature = "metadata")]
    fn exif_tiff() -> Vec<u8> {
        fn entry(tag: u16, kind: u16, count: u32, value: u32) -> Vec<u8> {
            [
                &tag.to_le_bytes()[..],
                &kind.to_le_bytes(),
                &count.to_le_bytes(),
                &value.to_le_bytes()
            ]
            .concat()
        }
        fn ifd(tiff: &mut Vec<u8>, entries: &[Vec<u8>], next: u32) {
            tiff.extend_from_slice(&(entries.len() as u16).to_le_bytes());
            entries.iter().for_each(|x| tiff.extend_from_slice(x));
            tiff.extend_from_slice(&next.to_le_bytes());
        }
        let mut tiff = b"II*\0".to_vec();
        tiff.extend_from_slice(&8_u32.to_le_bytes());
        // ifd0 at 8, ASCII Make at 38 and the Exif IFD pointer
        ifd(&mut tiff, &[entry(0x010F, 2, 6, 38), entry(0x8769, 4, 1, 44)], 70);
        tiff.extend_from_slice(b"Canon\0");
        // exif ifd at 44, RATIONAL ExposureTime at 62
        ifd(&mut tiff, &[entry(0x829A, 5, 1, 62)], 0);
        tiff.extend_from_slice(&1_u32.to_le_bytes());
        tiff.extend_from_slice(&60_u32.to_le_bytes());
        // ifd1 at 70, Model fits inline
        ifd(&mut tiff, &[entry(0x0110, 2, 4, u32::from_le_bytes(*b"Thm\0"))], 0);

        assert_eq!(tiff.len(), 88);
        tiff
    }

    #[cfg(feature = "metadata")]
    fn assert_camera_tags(tags: &TagMap) {
        assert_eq!(tags.get("Make"), Some(&TagValue::Scalar("Canon".to_string())));
        assert_eq!(
            tags.get("ExposureTime"),
            Some(&TagValue::Described {
                description: Some("1/60 s".to_string()),
                value:       Some("1/60".to_string())
            })
        );
        // thumbnail tags are skipped
        assert!(!tags.contains_key("Model"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    #[cfg(feature = "metadata")]
    fn exif_reader_reads_tiff() {
        let tags = ExifTagReader.read_tags(&exif_tiff()).unwrap();
        assert_camera_tags(&tags);
    }

    #[test]
    #[cfg(feature = "metadata")]
    fn exif_reader_reads_png_exif_chunk() {
        let png = PngEncoder::new(&[0, 0, 0, 255], 1, 1).encode().unwrap();
        let codec = ChunkCodec::new();
        let chunks = codec.parse(&png).unwrap();
        let exif = codec.chunk(*b"eXIf", exif_tiff());
        let png = codec.build(&codec.insert_before_iend(chunks, vec![exif]).unwrap());

        let tags = ExifTagReader.read_tags(&png).unwrap();
        assert_camera_tags(&tags);
    }

    #[test]
    #[cfg(feature = "metadata")]
    fn exif_reader_without_exif_is_empty() {
        let png = png_with_text(&[("Comment", "hello")]);

        assert!(ExifTagReader.read_tags(&png).unwrap().is_empty());
        assert!(ExifTagReader.read_tags(b"not an image").unwrap().is_empty());
    }

    #[test]
    #[cfg(feature = "metadata")]
    fn exif_reader_reports_broken_tiff() {
        let mut tiff = exif_tiff();
        tiff.truncate(20);

        assert!(ExifTagReader.read_tags(&tiff).is_err());
    }

    #[test]
    fn user_comment_charsets() {
        let mut ascii = b"ASCII\0\0\0".to_vec();
        ascii.extend_from_slice(b"Steps: 20\0");
        assert_eq!(decode_user_comment(&ascii), "Steps: 20");

        let mut utf16_be = b"UNICODE\0".to_vec();
        for unit in "a cat".encode_utf16() {
            utf16_be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_user_comment(&utf16_be), "a cat");

        let mut utf16_le = b"UNICODE\0".to_vec();
        for unit in "a cat".encode_utf16() {
            utf16_le.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_user_comment(&utf16_le), "a cat");
    }
}
