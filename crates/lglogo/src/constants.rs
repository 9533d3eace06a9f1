/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Absolute position of the container header
pub const HEADER_OFFSET: u64 = 0;
/// Size of the header as laid out on disk
pub const HEADER_SIZE: usize = 16 /*magic*/ + 4 /*count*/ + 4 /*unknown*/ + 16 /*tag*/ + 8 /*file size*/;

/// Absolute position of the first metadata record
pub const METADATA_OFFSET: u64 = 0x1000;
/// Size of one metadata record, name followed by six u32 fields
pub const METADATA_SIZE: usize = NAME_SIZE + 4 * 6;

/// Start of the payload region, the table has to fit in front of it
pub const DATA_OFFSET: u64 = 0x2000;

/// Number of records that fit between the table start and the payload region
pub const MAX_IMAGES: usize = (DATA_OFFSET - METADATA_OFFSET) as usize / METADATA_SIZE;

pub const MAGIC_SIZE: usize = 16;
pub const TAG_SIZE: usize = 16;
pub const NAME_SIZE: usize = 40;

/// Every payload starts on this boundary
pub const ALIGNMENT: u64 = 0x1000;

/// Size of a run length block, count + r + g + b
pub const RLE_BLOCK_SIZE: usize = 4;
/// Longest run a single block can carry
pub const RLE_MAX_RUN: u8 = u8::MAX;
