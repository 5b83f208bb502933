/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{debug, info, warn};
use retrobit_image::codecs::{decode, ImageFormat};
use retrobit_image::errors::ImageErrors;
use retrobit_image::metadata::{extract, preserve_metadata, MetadataReport};
use retrobit_imageprocs::retro::RetroPipeline;
use retrobit_png::PngEncoder;

use crate::cmd_parsers::global_options::CmdOptions;
use crate::file_io::{verify_file_paths, write_output, SourceFile};
use crate::serde::FileMetadata;

fn get_path<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a PathBuf, ImageErrors> {
    args.get_one::<PathBuf>(id).ok_or_else(|| {
        ImageErrors::GenericString(format!("Missing required argument `{id}`"))
    })
}

pub(crate) fn run_workflow_from_cmd(
    args: &ArgMatches, cmd_opts: &CmdOptions
) -> Result<(), ImageErrors> {
    info!("Creating workflow from input");

    let in_file = get_path(args, "in")?;
    let out_file = get_path(args, "out")?;

    verify_file_paths(in_file, out_file, cmd_opts.override_files)?;

    let source = SourceFile::read(in_file)?;
    let png = process_file(&source, cmd_opts)?;

    write_output(out_file, &png)
}

/// Run everything between reading the input and writing the output
pub(crate) fn process_file(
    source: &SourceFile, cmd_opts: &CmdOptions
) -> Result<Vec<u8>, ImageErrors> {
    let format = ImageFormat::guess_format(&source.bytes);
    debug!("Treating {:?} as a {:?} file", source.path, format);

    let report = if cmd_opts.keep_metadata || cmd_opts.dump_metadata {
        Some(extract_metadata(source, cmd_opts))
    } else {
        None
    };

    let image = decode(&source.bytes)?;
    let (width, height) = image.dimensions();
    info!("Decoded {width}x{height} image");

    let pipeline = RetroPipeline::new(cmd_opts.parameters);
    let output = pipeline.run(image, &mut |line: &str| eprintln!("{line}"))?;

    let (width, height) = output.dimensions();
    let png = PngEncoder::new(output.pixels(), width, height).encode()?;

    let metadata = report
        .as_ref()
        .filter(|_| cmd_opts.keep_metadata)
        .map(|x| &x.metadata);

    Ok(preserve_metadata(&png, metadata).into_owned())
}

fn extract_metadata(source: &SourceFile, cmd_opts: &CmdOptions) -> MetadataReport {
    let report = extract(&source.bytes, &source.info);

    for warning in &report.warnings {
        warn!("{warning}");
    }
    if let Some(parameters) = &report.metadata.ai.parsed_parameters {
        info!(
            "Found generation parameters, {} LoRA(s)",
            parameters.loras.len()
        );
    }
    if cmd_opts.dump_metadata {
        if let Err(err) = write_metadata_json(&mut stdout().lock(), &source.path, &report) {
            warn!("Could not dump metadata: {err:?}");
        }
    }
    report
}

fn write_metadata_json<W: Write>(
    writer: &mut W, path: &Path, report: &MetadataReport
) -> Result<(), ImageErrors> {
    let json = serde_json::to_string_pretty(&FileMetadata::new(path, report))
        .map_err(|x| ImageErrors::GenericString(x.to_string()))?;

    writeln!(writer, "{json}")?;
    Ok(())
}
