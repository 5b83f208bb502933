/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use retrobit_image::metadata::MetadataReport;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

pub struct FileMetadata<'a> {
    file:   &'a Path,
    report: &'a MetadataReport
}

impl<'a> FileMetadata<'a> {
    pub fn new(file: &'a Path, report: &'a MetadataReport) -> FileMetadata<'a> {
        FileMetadata { file, report }
    }
}

impl Serialize for FileMetadata<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("FileMetadata", 2)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("report", &self.report)?;

        state.end()
    }
}
