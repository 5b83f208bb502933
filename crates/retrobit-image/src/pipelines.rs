/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Pipelines, ordered image processing with progress reporting
//!
use std::sync::atomic::{AtomicBool, Ordering};

use retrobit_core::log::{debug, trace};
use web_time::Instant;

use crate::errors::ImageErrors;
use crate::image::PixelBuffer;
use crate::traits::OperationsTrait;

/// Receives one human readable line per finished operation
///
/// Implemented for every `FnMut(&str)`
pub trait ProgressSink {
    fn report(&mut self, message: &str);
}

impl<F: FnMut(&str)> ProgressSink for F {
    fn report(&mut self, message: &str) {
        self(message);
    }
}

/// A sink that drops every message
pub fn no_progress(_: &str) {}

/// Pipeline, ordered image processing
///
/// A pipeline owns a list of operations and runs them in insertion order,
/// each one consuming the output of the previous one.
///
/// After every operation the sink receives the operation's
/// [`progress_message`](OperationsTrait::progress_message), if an operation
/// fails the run stops and no image is returned.
#[derive(Default)]
pub struct Pipeline {
    operations: Vec<Box<dyn OperationsTrait>>
}

impl Pipeline {
    /// Create a new pipeline with no operations
    pub fn new() -> Pipeline {
        Pipeline::default()
    }

    /// Add a new operation to the pipeline.
    ///
    /// This is used as a way to chain multiple operations in a builder
    /// pattern style
    pub fn chain_operations(&mut self, operation: Box<dyn OperationsTrait>) -> &mut Pipeline {
        self.operations.push(operation);
        self
    }

    /// Names of the operations in the order they run
    pub fn operation_names(&self) -> Vec<&'static str> {
        self.operations.iter().map(|x| x.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Run every operation over `image`
    ///
    /// # Errors
    /// The first failing operation's error, as [`ImageErrors::StageFailed`]
    pub fn run<P: ProgressSink>(
        &self, image: PixelBuffer, progress: &mut P
    ) -> Result<PixelBuffer, ImageErrors> {
        self.run_inner(image, None, progress)
    }

    /// Run every operation over `image`, checking `abort` before each one
    ///
    /// The flag is only observed between operations, a running operation
    /// always completes.
    ///
    /// # Errors
    /// - [`ImageErrors::Aborted`] naming the operation that would have run next
    /// - The first failing operation's error, as [`ImageErrors::StageFailed`]
    pub fn run_with_abort<P: ProgressSink>(
        &self, image: PixelBuffer, abort: &AtomicBool, progress: &mut P
    ) -> Result<PixelBuffer, ImageErrors> {
        self.run_inner(image, Some(abort), progress)
    }

    fn run_inner<P: ProgressSink>(
        &self, mut image: PixelBuffer, abort: Option<&AtomicBool>, progress: &mut P
    ) -> Result<PixelBuffer, ImageErrors> {
        let start = Instant::now();

        for operation in &self.operations {
            let operation_name = operation.name();

            if abort.is_some_and(|x| x.load(Ordering::Relaxed)) {
                debug!("Abort requested before `{operation_name}`");
                return Err(ImageErrors::Aborted(operation_name));
            }
            trace!("Running {}", operation_name);

            image = operation.execute(&image)?;

            progress.report(&operation.progress_message(&image));
        }
        trace!(
            "Finished {} operations in {} ms",
            self.operations.len(),
            start.elapsed().as_millis()
        );
        Ok(image)
    }
}
