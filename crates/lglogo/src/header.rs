/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Fixed size records at the start of a container
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::str::Utf8Error;

use crate::constants::{HEADER_SIZE, MAGIC_SIZE, METADATA_SIZE, NAME_SIZE, TAG_SIZE};

/// A null padded ascii field of exactly `N` bytes
///
/// The bytes are kept as they are on disk, conversion to text
/// only happens through [`FixedBytes::to_text`] and [`FixedBytes::from_text`]
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FixedBytes<const N: usize>([u8; N]);

impl<const N: usize> FixedBytes<N> {
    pub const fn new(bytes: [u8; N]) -> FixedBytes<N> {
        FixedBytes(bytes)
    }

    /// Store `text` left justified and null padded
    ///
    /// Text longer than `N` bytes is truncated
    pub fn from_text(text: &str) -> FixedBytes<N> {
        let mut bytes = [0; N];
        let len = text.len().min(N);
        bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        FixedBytes(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// The field contents with trailing nulls removed
    pub fn trimmed(&self) -> &[u8] {
        trim_trailing_nulls(&self.0)
    }

    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.trimmed())
    }

    /// The trimmed field as text, failing on bytes that are not utf-8
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.trimmed())
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        FixedBytes([0; N])
    }
}

impl<const N: usize> Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_text())
    }
}

/// Strip the null padding at the end of a fixed width field
pub fn trim_trailing_nulls(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|x| *x != 0)
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

fn field<const N: usize>(bytes: &[u8], pos: usize) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&bytes[pos..pos + N]);
    out
}

/// Container header, stored at offset zero
///
/// ```text
/// 0x00  magic         16 bytes
/// 0x10  image count    u32
/// 0x14  unknown        u32
/// 0x18  metadata tag  16 bytes
/// 0x28  file size      u64
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ContainerHeader {
    pub magic:        FixedBytes<MAGIC_SIZE>,
    pub image_count:  u32,
    /// Opaque, carried over unchanged on repack
    pub unknown:      u32,
    pub metadata_tag: FixedBytes<TAG_SIZE>,
    /// Byte length of the container, the end of the last payload
    pub file_size:    u64
}

impl ContainerHeader {
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> ContainerHeader {
        ContainerHeader {
            magic:        FixedBytes::new(field(bytes, 0x00)),
            image_count:  u32_at(bytes, 0x10),
            unknown:      u32_at(bytes, 0x14),
            metadata_tag: FixedBytes::new(field(bytes, 0x18)),
            file_size:    u64::from_le_bytes(field(bytes, 0x28))
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0; HEADER_SIZE];

        out[0x00..0x10].copy_from_slice(self.magic.as_bytes());
        out[0x10..0x14].copy_from_slice(&self.image_count.to_le_bytes());
        out[0x14..0x18].copy_from_slice(&self.unknown.to_le_bytes());
        out[0x18..0x28].copy_from_slice(self.metadata_tag.as_bytes());
        out[0x28..0x30].copy_from_slice(&self.file_size.to_le_bytes());
        out
    }
}

/// One entry of the metadata table
///
/// Width and height describe the decoded image, the payload
/// itself may carry extra background rows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ImageMetadata {
    pub name:     FixedBytes<NAME_SIZE>,
    /// Absolute offset of the payload, a multiple of 4096
    pub offset:   u32,
    /// Byte length of the run length payload
    pub size:     u32,
    pub width:    u32,
    pub height:   u32,
    pub x_offset: u32,
    pub y_offset: u32
}

impl ImageMetadata {
    pub fn from_bytes(bytes: &[u8; METADATA_SIZE]) -> ImageMetadata {
        let n = NAME_SIZE;

        ImageMetadata {
            name:     FixedBytes::new(field(bytes, 0)),
            offset:   u32_at(bytes, n),
            size:     u32_at(bytes, n + 4),
            width:    u32_at(bytes, n + 8),
            height:   u32_at(bytes, n + 12),
            x_offset: u32_at(bytes, n + 16),
            y_offset: u32_at(bytes, n + 20)
        }
    }

    pub fn to_bytes(&self) -> [u8; METADATA_SIZE] {
        let mut out = [0; METADATA_SIZE];
        out[..NAME_SIZE].copy_from_slice(self.name.as_bytes());

        let fields = [
            self.offset,
            self.size,
            self.width,
            self.height,
            self.x_offset,
            self.y_offset
        ];
        for (chunk, value) in out[NAME_SIZE..].chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// End of the payload in the container
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// Number of raw RGB bytes the image decodes to
    ///
    /// `None` if that does not fit in a `usize`
    pub fn raw_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(3)
    }
}
