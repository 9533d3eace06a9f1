/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Boot logo firmware container decoder and encoder
//!
//! A container bundles several run length encoded images behind a
//! fixed header and metadata table. All integers are little endian.
//! ```text
//! ╔═════════╤═══════════════════════════════════════════════════════════╗
//! ║ Offset  │ Description                                               ║
//! ╠═════════╪═══════════════════════════════════════════════════════════╣
//! ║ 0x0000  │ Header, 48 bytes                                          ║
//! ║         │   16 magic, 4 image count, 4 unknown, 16 metadata tag,    ║
//! ║         │   8 file size                                             ║
//! ╟─────────┼───────────────────────────────────────────────────────────╢
//! ║ 0x1000  │ Metadata table, 64 bytes per image, at most 64 images     ║
//! ║         │   40 name, then 4 each for offset, size, width, height,   ║
//! ║         │   x offset, y offset                                      ║
//! ╟─────────┼───────────────────────────────────────────────────────────╢
//! ║ 0x2000  │ Payloads, each starting on a 4096 byte boundary           ║
//! ║         │   4 byte blocks of run length, then three channel bytes   ║
//! ╚═════════╧═══════════════════════════════════════════════════════════╝
//! ```
//! Stored pixels have red and blue exchanged relative to what is
//! displayed. Payloads may carry extra background rows below the
//! image, the recorded height excludes them.
//!
//! # Features
//! - `threads`: Decode images on multiple threads when unpacking
//!
//! # Example
//! Extract a container and build it back
//! ```no_run
//! use lglogo::{repack, unpack, PackOptions};
//!
//! let options = PackOptions::default();
//! unpack("logo.img", "pic", &options).unwrap();
//! repack("pic", "new.img", &options).unwrap();
//! ```
pub use zune_core;

pub use crate::align::{align_up, background_rows, extend_rows};
pub use crate::color::{swap_red_blue, swap_red_blue_in_place};
pub use crate::constants::*;
pub use crate::decoder::LogoDecoder;
pub use crate::encoder::{ImagePlacement, LogoEncoder};
pub use crate::errors::LogoErrors;
pub use crate::header::{ContainerHeader, FixedBytes, ImageMetadata};
pub use crate::image::LogoImage;
pub use crate::manifest::{image_file_name, Manifest, ManifestEntry, ManifestHeader, MANIFEST_FILE};
pub use crate::options::PackOptions;
pub use crate::repack::{encode_image, repack, repack_to_writer, EncodedImage};
pub use crate::rle::{decode_rle, decoded_size, encode_rle, rle_blocks, RunLengthBlock};
pub use crate::unpack::unpack;

mod align;
mod color;
pub mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod image;
mod manifest;
mod options;
mod repack;
mod rle;
mod serde;
mod unpack;
