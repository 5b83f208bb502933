/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Stable Diffusion style generation parameters
//!
//! Generators like AUTOMATIC1111 store their settings as free text
//!
//! ```text
//! a cat in a hat <lora:hats:0.8>
//! Negative prompt: blurry, lowres
//! Steps: 30, Sampler: DPM++ 2M, CFG scale: 7, Seed: 1234, Size: 512x768, Model: sd15
//! ```
//!
//! Parsing is best effort, anything that can't be understood is reported
//! as a warning and skipped.
use std::collections::BTreeMap;

use retrobit_core::log::debug;

const NEGATIVE_PROMPT: &str = "Negative prompt:";
const LORA_TAG: &str = "<lora:";

/// A LoRA referenced from the prompt with a `<lora:NAME:WEIGHT>` tag
#[derive(Clone, Debug, PartialEq)]
pub struct Lora {
    pub name:   String,
    pub weight: f32,
    /// Filled from the `Lora hashes` setting
    pub hash:   Option<String>
}

/// Settings decomposed from a generation parameters blob
///
/// Every field is optional, unrecognised settings end up in `extra`
/// keyed by the camel cased setting name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationParameters {
    pub positive_prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub loras:           Vec<Lora>,
    pub steps:           Option<String>,
    pub sampler:         Option<String>,
    pub schedule_type:   Option<String>,
    pub cfg_scale:       Option<String>,
    pub seed:            Option<String>,
    pub size:            Option<String>,
    pub width:           Option<u32>,
    pub height:          Option<u32>,
    pub model_hash:      Option<String>,
    pub model:           Option<String>,
    pub vae_hash:        Option<String>,
    pub vae:             Option<String>,
    pub lora_hashes:     Option<String>,
    pub version:         Option<String>,
    pub extra:           BTreeMap<String, String>
}

/// The result of parsing, the parameters that were understood and
/// a description of everything that wasn't
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseOutcome {
    pub params:   GenerationParameters,
    pub warnings: Vec<String>
}

/// Parse a generation parameters blob
///
/// This never fails, problems are collected in [`ParseOutcome::warnings`]
///
/// ```
/// use retrobit_image::metadata::parse_generation_parameters;
///
/// let text = "a cat\nNegative prompt: ugly\nSteps: 30, Sampler: DPM++ 3M, CFG scale: 6.5, Seed: 2921279476, Size: 888x1184";
/// let outcome = parse_generation_parameters(text);
///
/// assert_eq!(outcome.params.positive_prompt.as_deref(), Some("a cat"));
/// assert_eq!(outcome.params.negative_prompt.as_deref(), Some("ugly"));
/// assert_eq!(outcome.params.steps.as_deref(), Some("30"));
/// assert_eq!(outcome.params.width, Some(888));
/// assert_eq!(outcome.params.height, Some(1184));
/// assert!(outcome.warnings.is_empty());
/// ```
pub fn parse_generation_parameters(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let (positive, remaining) = split_positive(text);

    let (loras, positive) = extract_loras(&positive, &mut outcome.warnings);
    outcome.params.loras = loras;

    let positive = collapse_whitespace(&positive);
    if !positive.is_empty() {
        outcome.params.positive_prompt = Some(positive);
    }

    let mut negative_lines = vec![];
    let mut in_negative = false;

    for line in remaining.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(NEGATIVE_PROMPT) {
            in_negative = true;
            negative_lines.push(rest.trim());
        } else if is_settings_line(line) {
            parse_settings(line, &mut outcome);
            break;
        } else if in_negative {
            negative_lines.push(line);
        }
    }
    let negative = negative_lines.join("\n").trim().to_string();

    if !negative.is_empty() {
        outcome.params.negative_prompt = Some(negative);
    }
    attach_lora_hashes(&mut outcome);

    debug!(
        "Parsed generation parameters with {} warnings",
        outcome.warnings.len()
    );
    outcome
}

/// Split the positive prompt block from the rest of the text
fn split_positive(text: &str) -> (String, String) {
    if let Some(index) = text.find(NEGATIVE_PROMPT) {
        return (text[..index].to_string(), text[index..].to_string());
    }
    let lines: Vec<&str> = text.lines().collect();

    match lines.iter().position(|x| is_settings_line(x.trim())) {
        Some(index) => (lines[..index].join("\n"), lines[index..].join("\n")),
        None => (text.to_string(), String::new())
    }
}

/// Return true if the line looks like `Key: value, Key: value`
fn is_settings_line(line: &str) -> bool {
    if line.contains("Steps:") || line.contains("Sampler:") {
        return true;
    }
    let Some((key, rest)) = line.split_once(':') else {
        return false;
    };
    let key = key.trim();

    let key_is_word = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '_' || c == '-');

    key_is_word
        && rest
            .split_once(',')
            .is_some_and(|(value, _)| !value.trim().is_empty())
}

/// Pull `<lora:NAME:WEIGHT>` tags out of the prompt
fn extract_loras(prompt: &str, warnings: &mut Vec<String>) -> (Vec<Lora>, String) {
    let mut loras = vec![];
    let mut stripped = String::with_capacity(prompt.len());
    let mut rest = prompt;

    while let Some(start) = rest.find(LORA_TAG) {
        let Some(length) = rest[start..].find('>') else {
            break;
        };
        let inner = &rest[start + LORA_TAG.len()..start + length];

        // names may contain colons, the weight never does
        let (name, weight) = match inner.rsplit_once(':') {
            Some((name, weight)) => (name.trim(), Some(weight.trim())),
            None => (inner.trim(), None)
        };
        let weight = match weight.map(str::parse::<f32>) {
            Some(Ok(weight)) => weight,
            Some(Err(_)) => {
                warnings.push(format!("Invalid weight in LoRA tag `<lora:{inner}>`, using 1"));
                1.0
            }
            None => 1.0
        };
        if name.is_empty() {
            warnings.push(format!("LoRA tag `<lora:{inner}>` has no name"));
        } else {
            loras.push(Lora {
                name: name.to_string(),
                weight,
                hash: None
            });
        }
        stripped.push_str(&rest[..start]);
        rest = &rest[start + length + 1..];
    }
    stripped.push_str(rest);

    (loras, stripped)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Split on commas that are outside quotes and brackets
fn split_settings(line: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut in_quotes = false;
    let mut depth = 0_usize;
    let mut start = 0;

    for (position, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '{' | '[' if !in_quotes => depth += 1,
            '}' | ']' if !in_quotes => depth = depth.saturating_sub(1),
            ',' if !in_quotes && depth == 0 => {
                parts.push(&line[start..position]);
                start = position + 1;
            }
            _ => ()
        }
    }
    parts.push(&line[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_settings(line: &str, outcome: &mut ParseOutcome) {
    for pair in split_settings(line) {
        let Some((key, value)) = pair.split_once(':') else {
            outcome
                .warnings
                .push(format!("Malformed setting `{pair}`, expected `key: value`"));
            continue;
        };
        let (key, value) = (key.trim(), value.trim().to_string());

        if key.is_empty() {
            outcome
                .warnings
                .push(format!("Setting `{pair}` has no name"));
            continue;
        }
        let params = &mut outcome.params;

        match key.to_lowercase().as_str() {
            "steps" => params.steps = Some(value),
            "sampler" => params.sampler = Some(value),
            "schedule type" => params.schedule_type = Some(value),
            "cfg scale" => params.cfg_scale = Some(value),
            "seed" => params.seed = Some(value),
            "size" => {
                match parse_size(&value) {
                    Some((width, height)) => {
                        params.width = Some(width);
                        params.height = Some(height);
                    }
                    None => outcome
                        .warnings
                        .push(format!("Could not read dimensions from size `{value}`"))
                }
                params.size = Some(value);
            }
            "model hash" => params.model_hash = Some(value),
            "model" => params.model = Some(value),
            "vae hash" => params.vae_hash = Some(value),
            "vae" => params.vae = Some(value),
            "lora hashes" => params.lora_hashes = Some(unquote(&value).to_string()),
            "version" => params.version = Some(value),
            _ => {
                let name = camel_case(key);

                if name.is_empty() {
                    outcome
                        .warnings
                        .push(format!("Setting name `{key}` has no usable characters"));
                } else {
                    params.extra.insert(name, value);
                }
            }
        }
    }
}

/// Read `WIDTHxHEIGHT`
fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.split_once(['x', 'X'])?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|x| x.strip_suffix('"'))
        .unwrap_or(value)
}

/// `Denoising strength` becomes `denoisingStrength`
fn camel_case(key: &str) -> String {
    let mut output = String::with_capacity(key.len());

    for (i, word) in key
        .split(|c: char| !c.is_alphanumeric())
        .filter(|x| !x.is_empty())
        .enumerate()
    {
        if i == 0 {
            output.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                output.extend(first.to_uppercase());
                output.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    output
}

/// Match `Lora hashes: "name: hash, name: hash"` back onto the prompt's LoRAs
fn attach_lora_hashes(outcome: &mut ParseOutcome) {
    let Some(hashes) = outcome.params.lora_hashes.clone() else {
        return;
    };
    for segment in hashes.split(',').map(str::trim).filter(|x| !x.is_empty()) {
        // names may contain colons, hashes don't
        let Some((name, hash)) = segment.rsplit_once(':') else {
            outcome
                .warnings
                .push(format!("Malformed LoRA hash `{segment}`"));
            continue;
        };
        let (name, hash) = (name.trim(), hash.trim());

        match outcome.params.loras.iter_mut().find(|x| x.name == name) {
            Some(lora) => lora.hash = Some(hash.to_string()),
            None => outcome
                .warnings
                .push(format!("LoRA hash for `{name}` has no matching <lora:> tag"))
        }
    }
}
