/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Options shared by the unpack and repack pipelines

/// Options influencing how containers are unpacked and repacked
///
/// Setters consume and return the options so they can be chained
///
/// ```
/// use lglogo::PackOptions;
///
/// let options = PackOptions::default().set_padding(false).set_threads(2);
/// assert!(!options.padding());
/// ```
#[derive(Debug, Copy, Clone)]
pub struct PackOptions {
    /// Extend images with background rows on repack when their
    /// placement asks for it
    ///
    /// - Default value: true
    /// - Respected by: `repack`
    padding: bool,
    /// Log every metadata record while unpacking
    ///
    /// - Default value: false
    /// - Respected by: `unpack`
    verbose: bool,
    /// Upper bound of worker threads decoding images
    ///
    /// - Default value: available parallelism
    /// - Respected by: `unpack`
    threads: usize
}

impl Default for PackOptions {
    fn default() -> Self {
        let threads = std::thread::available_parallelism().map_or(1, |x| x.get());

        PackOptions {
            padding: true,
            verbose: false,
            threads
        }
    }
}

impl PackOptions {
    pub const fn padding(&self) -> bool {
        self.padding
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Enable or disable the background padding used by some
    /// devices, disabling it is what `--nopadding` does
    pub fn set_padding(mut self, yes: bool) -> Self {
        self.padding = yes;
        self
    }

    pub fn set_verbose(mut self, yes: bool) -> Self {
        self.verbose = yes;
        self
    }

    /// Set the maximum number of threads used during unpack
    ///
    /// Zero is treated as one
    pub fn set_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}
