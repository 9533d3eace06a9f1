/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Container to image directory
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, trace};

use crate::decoder::LogoDecoder;
use crate::errors::LogoErrors;
use crate::header::ImageMetadata;
use crate::manifest::{image_file_name, Manifest, MANIFEST_FILE};
use crate::options::PackOptions;

/// One image to extract, its table index and destination file
struct ExtractJob {
    index: usize,
    path:  PathBuf
}

fn prepare_output_dir(out_dir: &Path) -> Result<(), LogoErrors> {
    if out_dir.exists() {
        if !out_dir.is_dir() {
            return Err(LogoErrors::Generic(format!(
                "Cannot save to {}, it is not a directory",
                out_dir.display()
            )));
        }
        return Ok(());
    }
    debug!("Creating output directory {}", out_dir.display());
    fs::create_dir_all(out_dir)?;
    Ok(())
}

fn log_record(index: usize, count: usize, record: &ImageMetadata, verbose: bool) {
    if verbose {
        info!(
            "NUM {index}: name {:?}, offset {}, size {}, width {}, height {}, xoffset {}, yoffset {}",
            record.name,
            record.offset,
            record.size,
            record.width,
            record.height,
            record.x_offset,
            record.y_offset
        );
    } else {
        info!("[{:02}/{:02}] Extract [{:>30}]...", index + 1, count, record.name.to_text());
    }
}

fn extract(decoder: &LogoDecoder, job: &ExtractJob) -> Result<(), LogoErrors> {
    let image = decoder.decode_image(job.index)?;
    image.save_png(&job.path)?;

    trace!("Wrote {}", job.path.display());
    Ok(())
}

#[cfg(feature = "threads")]
fn run_jobs(decoder: &LogoDecoder, jobs: &[ExtractJob], threads: usize) -> Result<(), LogoErrors> {
    if jobs.is_empty() {
        return Ok(());
    }
    let workers = threads.clamp(1, jobs.len());
    let batch_size = jobs.len().div_ceil(workers);

    trace!("Extracting {} images on {workers} threads", jobs.len());

    std::thread::scope(|s| {
        let handles: Vec<_> = jobs
            .chunks(batch_size)
            .map(|batch| {
                s.spawn(move || -> Result<(), LogoErrors> {
                    for job in batch {
                        extract(decoder, job)?;
                    }
                    Ok(())
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or(Err(LogoErrors::GenericStatic("Image worker panicked")))
            })
            .collect::<Result<Vec<()>, LogoErrors>>()
    })?;
    Ok(())
}

#[cfg(not(feature = "threads"))]
fn run_jobs(decoder: &LogoDecoder, jobs: &[ExtractJob], _threads: usize) -> Result<(), LogoErrors> {
    trace!("Extracting {} images in single threaded mode", jobs.len());

    for job in jobs {
        extract(decoder, job)?;
    }
    Ok(())
}

/// Extract every image of the container at `container` into `out_dir`
///
/// Each image is written as `<name>.png` and the header fields and
/// placements are written to `info.toml`, which is only created after
/// every image has been written successfully.
///
/// Images are decoded concurrently, bounded by [`PackOptions::threads`].
/// The first failure aborts the whole run.
///
/// # Returns
/// The manifest that was written
pub fn unpack<P: AsRef<Path>, Q: AsRef<Path>>(
    container: P, out_dir: Q, options: &PackOptions
) -> Result<Manifest, LogoErrors> {
    let container = container.as_ref();
    let out_dir = out_dir.as_ref();
    let start = Instant::now();

    info!("Unpacking {}", container.display());

    let data = fs::read(container)?;
    prepare_output_dir(out_dir)?;

    let mut decoder = LogoDecoder::new(&data);
    decoder.decode_headers()?;

    let header = decoder
        .header()
        .ok_or(LogoErrors::GenericStatic("Container headers were not decoded"))?;
    let records = decoder.metadata();

    let manifest = Manifest::from_container(header, records)?;

    let mut jobs = Vec::with_capacity(records.len());
    let mut seen = HashSet::with_capacity(records.len());

    for (index, (record, entry)) in records.iter().zip(&manifest.images).enumerate() {
        log_record(index, records.len(), record, options.verbose());

        if !seen.insert(record.name) {
            return Err(LogoErrors::CorruptContainer(format!(
                "Image name {:?} appears more than once",
                record.name
            )));
        }
        let file_name = image_file_name(&entry.name).ok_or_else(|| {
            LogoErrors::CorruptContainer(format!(
                "Image name {:?} cannot be used as a file name",
                entry.name
            ))
        })?;
        jobs.push(ExtractJob {
            index,
            path: out_dir.join(file_name)
        });
    }

    run_jobs(&decoder, &jobs, options.threads())?;

    let manifest_path = out_dir.join(MANIFEST_FILE);
    manifest.save_to(&manifest_path)?;

    info!("Done, images saved into {}", out_dir.display());
    info!("Manifest saved to {}", manifest_path.display());
    trace!("Unpacking took {:?}", start.elapsed());

    Ok(manifest)
}
