/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::OpenOptions;
use std::io::{stderr, stdin, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use log::{debug, info};
use retrobit_image::errors::ImageErrors;
use retrobit_image::metadata::FileInfo;

/// An input file read fully into memory
pub struct SourceFile {
    pub path:  PathBuf,
    pub bytes: Vec<u8>,
    pub info:  FileInfo
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<SourceFile, ImageErrors> {
        let bytes = std::fs::read(path)?;
        let fs_metadata = std::fs::metadata(path)?;

        let name = path
            .file_name()
            .map(|x| x.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut info = FileInfo::new(&name, fs_metadata.len());

        info.last_modified = fs_metadata
            .modified()
            .ok()
            .and_then(|x| x.duration_since(UNIX_EPOCH).ok())
            .and_then(|x| u64::try_from(x.as_millis()).ok());

        debug!("Read {} bytes from {:?}", bytes.len(), path);

        Ok(SourceFile { path: path.to_path_buf(), bytes, info })
    }
}

pub fn write_output(path: &Path, data: &[u8]) -> Result<(), ImageErrors> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)?;

    let mut buf_writer = BufWriter::new(file);

    buf_writer.write_all(data)?;
    buf_writer.flush()?;

    info!("Wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}

pub fn verify_file_paths(
    in_path: &Path, out_path: &Path, override_files: bool
) -> Result<(), ImageErrors> {
    if in_path == out_path {
        return Err(ImageErrors::GenericString(format!(
            "Cannot use {in_path:?} as both input and output"
        )));
    }

    if !in_path.exists() {
        return Err(ImageErrors::GenericString(format!(
            "Path {in_path:?}, does not exist"
        )));
    }

    if !in_path.is_file() {
        return Err(ImageErrors::GenericString(format!(
            "Path {in_path:?} is not a file"
        )));
    }

    if out_path.extension().is_some_and(|x| !x.eq_ignore_ascii_case("png")) {
        info!("Output {:?} will contain PNG data", out_path);
    }

    if out_path.exists() {
        if override_files {
            info!("Overwriting path {:?} ", out_path);
        } else {
            confirm_overwrite(out_path, &mut stdin().lock(), &mut stderr().lock())?;
        }
    }
    Ok(())
}

/// Ask on `prompt` whether `out_path` may be overwritten
///
/// The prompt never goes to stdout, that's reserved for `--dump-metadata`
fn confirm_overwrite<R: BufRead, W: Write>(
    out_path: &Path, answer: &mut R, prompt: &mut W
) -> Result<(), ImageErrors> {
    writeln!(prompt, "File {out_path:?} exists, overwrite [y/N]")?;
    let mut result = String::new();

    answer.read_line(&mut result)?;

    if result.trim() != "y" {
        return Err(ImageErrors::GenericString(format!(
            "Not overwriting file {out_path:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_prompt_accepts_y() {
        let mut prompt = vec![];
        let result = confirm_overwrite(Path::new("out.png"), &mut &b"y\n"[..], &mut prompt);

        assert!(result.is_ok());
        assert_eq!(
            String::from_utf8(prompt).unwrap(),
            "File \"out.png\" exists, overwrite [y/N]\n"
        );
    }

    #[test]
    fn overwrite_prompt_defaults_to_no() {
        let answers: [&[u8]; 4] = [b"\n", b"n\n", b"yes\n", b""];

        for mut answer in answers {
            let mut prompt: Vec<u8> = vec![];
            let result = confirm_overwrite(Path::new("out.png"), &mut answer, &mut prompt);
            assert!(result.is_err());
        }
    }

    #[test]
    fn same_input_and_output_is_rejected() {
        let path = Path::new("image.png");
        assert!(verify_file_paths(path, path, true).is_err());
    }
}

