/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Serialization of container records, used when probing files
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::header::{ContainerHeader, FixedBytes, ImageMetadata};

impl<const N: usize> Serialize for FixedBytes<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(&self.to_text())
    }
}

impl Serialize for ContainerHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ContainerHeader", 5)?;

        state.serialize_field("magic", &self.magic)?;
        state.serialize_field("image_count", &self.image_count)?;
        state.serialize_field("unknown", &self.unknown)?;
        state.serialize_field("metadata_tag", &self.metadata_tag)?;
        state.serialize_field("file_size", &self.file_size)?;

        state.end()
    }
}

impl Serialize for ImageMetadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ImageMetadata", 7)?;

        state.serialize_field("name", &self.name)?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("xoffset", &self.x_offset)?;
        state.serialize_field("yoffset", &self.y_offset)?;

        state.end()
    }
}
