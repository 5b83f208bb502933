/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};
use retrobit_image::errors::ImageErrors;
use retrobit_imageprocs::retro::TransformParameters;

#[derive(Debug, Copy, Clone)]
pub struct CmdOptions {
    pub override_files: bool,
    pub keep_metadata:  bool,
    pub dump_metadata:  bool,
    pub parameters:     TransformParameters
}

impl CmdOptions {
    pub fn new() -> CmdOptions {
        CmdOptions {
            override_files: false,
            keep_metadata:  true,
            dump_metadata:  false,
            parameters:     TransformParameters::default()
        }
    }
}

pub fn parse_options(options: &ArgMatches) -> Result<CmdOptions, ImageErrors> {
    let mut cmd_options = CmdOptions::new();

    let scale = options.get_one::<u16>("scale").copied().unwrap_or(4);
    let colors = options.get_one::<u16>("colors").copied().unwrap_or(32);

    cmd_options.parameters = TransformParameters::new(usize::from(scale), usize::from(colors))?
        .set_quantize(options.get_flag("quantize"))
        .set_rgb555(options.get_flag("rgb555"))
        .set_snescrop(options.get_flag("snescrop"))
        .set_rescale(options.get_flag("rescale"));

    info!("Transform parameters: {:?}", cmd_options.parameters);

    if options.get_flag("all-yes") {
        info!("Setting all commands to yes");
        cmd_options.override_files = true;
    }
    if options.get_flag("no-metadata") {
        info!("Not preserving source metadata");
        cmd_options.keep_metadata = false;
    }
    cmd_options.dump_metadata = options.get_flag("dump-metadata");

    Ok(cmd_options)
}

fn log_level(options: &ArgMatches) -> Level {
    if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    }
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = log_level(options);

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
