/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{Seek, SeekFrom, Write};

use log::trace;

use crate::align::align_up;
use crate::constants::{DATA_OFFSET, HEADER_OFFSET, MAX_IMAGES, METADATA_OFFSET};
use crate::errors::LogoErrors;
use crate::header::{ContainerHeader, FixedBytes, ImageMetadata};

/// Placement and dimensions of an encoded image
#[derive(Copy, Clone, Debug)]
pub struct ImagePlacement<'a> {
    pub name:     &'a str,
    /// Dimensions of the image before any background padding
    pub width:    u32,
    pub height:   u32,
    pub x_offset: u32,
    pub y_offset: u32
}

/// A boot logo container encoder
///
/// Payloads are written as they are added, each one starting on
/// the next 4096 byte boundary after the previous payload's end.
/// The metadata table and header are written last by [`finish`]
/// since the file size is only known once every payload is placed.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use lglogo::{ImagePlacement, LogoEncoder};
///
/// let mut encoder = LogoEncoder::new(Cursor::new(vec![]), "MAGIC", 0, "TAG");
/// let placement = ImagePlacement { name: "boot", width: 1, height: 1, x_offset: 0, y_offset: 0 };
/// encoder.add_image(placement, &[1, 0, 0, 0]).unwrap();
///
/// let (header, sink) = encoder.finish().unwrap();
/// assert_eq!(header.file_size, 0x2004);
/// assert_eq!(sink.into_inner().len(), 0x2004);
/// ```
///
/// [`finish`]:LogoEncoder::finish
pub struct LogoEncoder<W: Write + Seek> {
    sink:     W,
    header:   ContainerHeader,
    metadata: Vec<ImageMetadata>,
    cursor:   u64
}

impl<W: Write + Seek> LogoEncoder<W> {
    /// Create an encoder writing to `sink`
    ///
    /// `magic` and `metadata_tag` are truncated to 16 bytes
    pub fn new(sink: W, magic: &str, unknown: u32, metadata_tag: &str) -> LogoEncoder<W> {
        let header = ContainerHeader {
            magic: FixedBytes::from_text(magic),
            image_count: 0,
            unknown,
            metadata_tag: FixedBytes::from_text(metadata_tag),
            file_size: 0
        };
        LogoEncoder {
            sink,
            header,
            metadata: vec![],
            cursor: DATA_OFFSET
        }
    }

    /// Records of every image added so far
    pub fn metadata(&self) -> &[ImageMetadata] {
        &self.metadata
    }

    /// Write the run length `payload` of an image and record its metadata
    ///
    /// # Errors
    /// - More than 64 images were added
    /// - The payload would end past what a 32 bit offset can address
    /// - Writing to the sink fails
    pub fn add_image(
        &mut self, placement: ImagePlacement, payload: &[u8]
    ) -> Result<&ImageMetadata, LogoErrors> {
        if self.metadata.len() >= MAX_IMAGES {
            return Err(LogoErrors::ManifestError(format!(
                "A container holds at most {MAX_IMAGES} images"
            )));
        }
        let offset = align_up(self.cursor);
        let end = offset + payload.len() as u64;

        if end > u64::from(u32::MAX) {
            return Err(LogoErrors::Generic(format!(
                "Image {} would end at {end:#x}, past the 32 bit offset range",
                placement.name
            )));
        }
        trace!(
            "Writing {} bytes of {} at {offset:#x}",
            payload.len(),
            placement.name
        );
        self.sink.seek(SeekFrom::Start(offset))?;
        self.sink.write_all(payload)?;

        self.metadata.push(ImageMetadata {
            name:     FixedBytes::from_text(placement.name),
            offset:   offset as u32,
            size:     payload.len() as u32,
            width:    placement.width,
            height:   placement.height,
            x_offset: placement.x_offset,
            y_offset: placement.y_offset
        });
        // the next image aligns from the exact end of this one
        self.cursor = end;

        Ok(&self.metadata[self.metadata.len() - 1])
    }

    /// Write the metadata table and header, returning the header and the sink
    pub fn finish(mut self) -> Result<(ContainerHeader, W), LogoErrors> {
        self.header.image_count = self.metadata.len() as u32;
        self.header.file_size = self.cursor;

        if self.cursor == DATA_OFFSET {
            // no payload bytes were written, extend the sink to the payload area
            self.sink.seek(SeekFrom::Start(DATA_OFFSET - 1))?;
            self.sink.write_all(&[0])?;
        }
        self.sink.seek(SeekFrom::Start(METADATA_OFFSET))?;
        for record in &self.metadata {
            self.sink.write_all(&record.to_bytes())?;
        }
        self.sink.seek(SeekFrom::Start(HEADER_OFFSET))?;
        self.sink.write_all(&self.header.to_bytes())?;
        self.sink.flush()?;

        Ok((self.header, self.sink))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::decoder::LogoDecoder;

    fn placement(name: &str) -> ImagePlacement {
        ImagePlacement {
            name,
            width: 1,
            height: 1,
            x_offset: 3,
            y_offset: 4
        }
    }

    #[test]
    fn test_offsets_are_aligned_from_previous_end() {
        let mut encoder = LogoEncoder::new(Cursor::new(vec![]), "MAGIC", 9, "TAG");

        let first = vec![1_u8; 4100];
        let second = vec![2_u8; 8];
        let third = vec![3_u8; 4];

        assert_eq!(encoder.add_image(placement("a"), &first).unwrap().offset, 0x2000);
        assert_eq!(encoder.add_image(placement("b"), &second).unwrap().offset, 0x4000);
        assert_eq!(encoder.add_image(placement("c"), &third).unwrap().offset, 0x5000);

        let (header, sink) = encoder.finish().unwrap();
        assert_eq!(header.image_count, 3);
        assert_eq!(header.file_size, 0x5004);

        let data = sink.into_inner();
        assert_eq!(data.len(), 0x5004);
        assert!(data[0x3004..0x4000].iter().all(|x| *x == 0));
    }

    #[test]
    fn test_written_container_decodes() {
        let mut encoder = LogoEncoder::new(Cursor::new(vec![]), "MAGIC", 9, "TAG");
        encoder.add_image(placement("first"), &[1, 10, 20, 30]).unwrap();
        encoder.add_image(placement("second"), &[1, 40, 50, 60]).unwrap();

        let (_, sink) = encoder.finish().unwrap();
        let data = sink.into_inner();

        let mut decoder = LogoDecoder::new(&data);
        decoder.decode_headers().unwrap();

        let header = decoder.header().unwrap();
        assert_eq!(header.magic.to_text(), "MAGIC");
        assert_eq!(header.unknown, 9);
        assert_eq!(header.metadata_tag.to_text(), "TAG");

        let names: Vec<_> = decoder.metadata().iter().map(|x| x.name.to_text()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(decoder.metadata()[1].x_offset, 3);
        assert_eq!(decoder.metadata()[1].y_offset, 4);
        assert_eq!(decoder.payload(1).unwrap(), [1, 40, 50, 60]);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut encoder = LogoEncoder::new(Cursor::new(vec![]), "M", 0, "T");
        let name = "n".repeat(50);

        let record = encoder.add_image(placement(&name), &[1, 0, 0, 0]).unwrap();
        assert_eq!(record.name.to_text(), "n".repeat(40));
    }

    #[test]
    fn test_empty_container_spans_table() {
        let encoder = LogoEncoder::new(Cursor::new(vec![]), "M", 0, "T");
        let (header, sink) = encoder.finish().unwrap();

        assert_eq!(header.image_count, 0);
        assert_eq!(header.file_size, 0x2000);
        assert_eq!(sink.into_inner().len(), 0x2000);
    }

    #[test]
    fn test_table_is_limited() {
        let mut encoder = LogoEncoder::new(Cursor::new(vec![]), "M", 0, "T");

        for _ in 0..64 {
            encoder.add_image(placement("x"), &[1, 0, 0, 0]).unwrap();
        }
        assert!(encoder.add_image(placement("x"), &[1, 0, 0, 0]).is_err());
    }
}
