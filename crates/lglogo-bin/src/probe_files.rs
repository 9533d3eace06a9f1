/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;
use std::path::Path;

use lglogo::{LogoDecoder, LogoErrors};
use serde_json::json;

/// Probe a container, print its header and metadata table to standard output.
pub fn probe_input_file(path: &Path) -> Result<(), LogoErrors> {
    let data = fs::read(path)?;

    let mut decoder = LogoDecoder::new(&data);
    decoder.decode_headers()?;

    let summary = json!({
        "file": path.display().to_string(),
        "length": data.len(),
        "header": decoder.header(),
        "images": decoder.metadata()
    });
    let text = serde_json::to_string_pretty(&summary)
        .map_err(|e| LogoErrors::Generic(format!("Could not serialize probe result: {e}")))?;

    println!("{text}");
    Ok(())
}
