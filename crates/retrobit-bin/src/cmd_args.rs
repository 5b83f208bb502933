/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::cmd_args::help_strings::{COLORS_HELP, QUANTIZE_HELP, RESCALE_HELP, SCALE_HELP};

pub mod help_strings;

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("retrobit")
        .about("Give images a retro, pixel art look")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input file to read data from")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("PNG file to write the result to")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("all-yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Overwrite the output file without asking"))
        .arg(Arg::new("scale")
            .long("scale")
            .help_heading("OPERATIONS")
            .help("Pixelation factor")
            .long_help(SCALE_HELP)
            .value_parser(value_parser!(u16).range(1..))
            .default_value("4"))
        .arg(Arg::new("colors")
            .long("colors")
            .help_heading("OPERATIONS")
            .help("Color budget, between 4 and 256")
            .long_help(COLORS_HELP)
            .value_parser(value_parser!(u16).range(4..=256))
            .default_value("32"))
        .arg(Arg::new("quantize")
            .long("quantize")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Use median cut quantization instead of posterization")
            .long_help(QUANTIZE_HELP))
        .arg(Arg::new("rgb555")
            .long("rgb555")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Limit colors to 15 bits, 5 bits per channel"))
        .arg(Arg::new("snescrop")
            .long("snescrop")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Crop the center 256x224 area"))
        .arg(Arg::new("rescale")
            .long("rescale")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Scale the result back up by the pixelation factor")
            .long_help(RESCALE_HELP))
        .arg(Arg::new("no-metadata")
            .long("no-metadata")
            .help_heading("METADATA")
            .action(ArgAction::SetTrue)
            .help("Do not carry source metadata into the output"))
        .arg(Arg::new("dump-metadata")
            .long("dump-metadata")
            .help_heading("METADATA")
            .action(ArgAction::SetTrue)
            .help("Print extracted metadata as JSON"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the processing steps"))
}
